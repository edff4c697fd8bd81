use super::Direction;
use crate::Frame;

/// One direction change recorded at an exact simulation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub direction: Direction,
    pub frame: Frame,
    pub time: i64,
}

/// Maximum accepted payload size for the semicolon-delimited move string,
/// checked before any parsing happens.
pub const MAX_MOVES_BYTES: usize = 50_000;

/// Parses the compact `d,f,t;d,f,t;...` move log. The legacy two-field
/// `d,t` form is accepted and treated as `f = 0`. Entries that fail to
/// parse as integers are dropped silently rather than aborting the whole
/// log, matching the reference client's tolerant behavior.
pub fn decode_moves(payload: &str) -> Vec<Move> {
    if payload.len() > MAX_MOVES_BYTES {
        return Vec::new();
    }
    payload
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(decode_one_move)
        .collect()
}

fn decode_one_move(entry: &str) -> Option<Move> {
    let fields: Vec<&str> = entry.split(',').collect();
    match fields.as_slice() {
        [d, f, t] => {
            let d: i64 = d.trim().parse().ok()?;
            let f: Frame = f.trim().parse().ok()?;
            let t: i64 = t.trim().parse().ok()?;
            Some(Move {
                direction: Direction::from_code(d)?,
                frame: f,
                time: t,
            })
        }
        [d, t] => {
            let d: i64 = d.trim().parse().ok()?;
            let t: i64 = t.trim().parse().ok()?;
            Some(Move {
                direction: Direction::from_code(d)?,
                frame: 0,
                time: t,
            })
        }
        _ => None,
    }
}

/// Canonical encoding: always the three-field form, regardless of whether
/// the input used the legacy two-field form.
pub fn encode_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| format!("{},{},{}", m.direction.code(), m.frame, m.time))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decodes_three_field_form() {
        let moves = decode_moves("0,5,100;1,12,340");
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].direction, Direction::Up);
        assert_eq!(moves[0].frame, 5);
        assert_eq!(moves[0].time, 100);
    }

    #[test]
    fn decodes_legacy_two_field_form_as_frame_zero() {
        let moves = decode_moves("2,400");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].direction, Direction::Down);
        assert_eq!(moves[0].frame, 0);
        assert_eq!(moves[0].time, 400);
    }

    #[test]
    fn drops_unparseable_entries_silently() {
        let moves = decode_moves("0,5,100;garbage;1,6,200");
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn rejects_oversized_payload() {
        let huge = "0,1,1;".repeat(MAX_MOVES_BYTES);
        assert!(decode_moves(&huge).is_empty());
    }

    #[test]
    fn encode_decode_round_trip_is_canonical() {
        let moves = vec![
            Move {
                direction: Direction::Right,
                frame: 3,
                time: 42,
            },
            Move {
                direction: Direction::Left,
                frame: 9,
                time: 88,
            },
        ];
        let encoded = encode_moves(&moves);
        let decoded = decode_moves(&encoded);
        assert_eq!(decoded, moves);
        // re-encoding the decoded form is idempotent (canonical form property)
        assert_eq!(encode_moves(&decoded), encoded);
    }

    #[test]
    fn empty_payload_decodes_to_empty() {
        assert!(decode_moves("").is_empty());
    }

    proptest::proptest! {
        #[test]
        fn encode_then_decode_recovers_arbitrary_move_lists(
            entries in proptest::collection::vec(
                (0i64..4, any::<u32>(), any::<i64>()),
                0..50,
            ),
        ) {
            let moves: Vec<Move> = entries
                .into_iter()
                .map(|(d, frame, time)| Move {
                    direction: Direction::from_code(d).unwrap(),
                    frame,
                    time,
                })
                .collect();
            let encoded = encode_moves(&moves);
            let decoded = decode_moves(&encoded);
            proptest::prop_assert_eq!(decoded, moves);
        }
    }
}
