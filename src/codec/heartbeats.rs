use crate::Frame;

/// Periodic client self-report used to corroborate wall-clock vs.
/// monotonic-clock progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heartbeat {
    pub time: i64,
    pub perf: i64,
    pub frame: Frame,
    pub speed: i64,
    pub score: Option<i32>,
}

pub const MAX_HEARTBEATS_BYTES: usize = 10_000;

/// Parses the `t,p,f,s[,score]` tuples, `;`-delimited. Entries that fail to
/// parse are dropped silently, mirroring the move codec.
pub fn decode_heartbeats(payload: &str) -> Vec<Heartbeat> {
    if payload.len() > MAX_HEARTBEATS_BYTES {
        return Vec::new();
    }
    payload
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(decode_one_heartbeat)
        .collect()
}

fn decode_one_heartbeat(entry: &str) -> Option<Heartbeat> {
    let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
    if fields.len() < 4 {
        return None;
    }
    let time: i64 = fields[0].parse().ok()?;
    let perf: i64 = fields[1].parse().ok()?;
    let frame: Frame = fields[2].parse().ok()?;
    let speed: i64 = fields[3].parse().ok()?;
    let score = fields.get(4).and_then(|s| s.parse().ok());
    Some(Heartbeat {
        time,
        perf,
        frame,
        speed,
        score,
    })
}

pub fn encode_heartbeats(beats: &[Heartbeat]) -> String {
    beats
        .iter()
        .map(|h| match h.score {
            Some(score) => format!("{},{},{},{},{}", h.time, h.perf, h.frame, h.speed, score),
            None => format!("{},{},{},{}", h.time, h.perf, h.frame, h.speed),
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_without_optional_score() {
        let beats = decode_heartbeats("1000,980,10,150");
        assert_eq!(beats.len(), 1);
        assert_eq!(beats[0].score, None);
    }

    #[test]
    fn decodes_with_optional_score() {
        let beats = decode_heartbeats("1000,980,10,150,40");
        assert_eq!(beats[0].score, Some(40));
    }

    #[test]
    fn round_trip_preserves_fields() {
        let beats = vec![Heartbeat {
            time: 2000,
            perf: 1995,
            frame: 20,
            speed: 147,
            score: Some(20),
        }];
        let encoded = encode_heartbeats(&beats);
        assert_eq!(decode_heartbeats(&encoded), beats);
    }

    #[test]
    fn rejects_oversized_payload() {
        let huge = "1,1,1,1;".repeat(MAX_HEARTBEATS_BYTES);
        assert!(decode_heartbeats(&huge).is_empty());
    }
}
