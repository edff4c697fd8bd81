use super::verdict::{FoodEvent, FrameSnapshot, ReplayVerdict};
use crate::codec::{Direction, Move};
use crate::config::ReplayConfig;
use crate::rng::{place_food, Point};
use crate::Seed;
use std::collections::VecDeque;

/// Defensive bound on food events per replay; a client claiming more than
/// this is almost certainly lying about `totalFrames`/moves rather than
/// having played an extraordinarily long game.
const MAX_FOOD_EATEN: u32 = 1000;

/// Re-simulates a game frame by frame from `(seed, moves)`. Pure: the same
/// inputs always produce the same `ReplayVerdict` (P1).
pub struct Engine {
    cfg: ReplayConfig,
}

impl Engine {
    pub fn new(cfg: ReplayConfig) -> Self {
        Self { cfg }
    }

    pub fn run(&self, seed: Seed, moves: &[Move], total_frames: u32) -> ReplayVerdict {
        let grid = self.cfg.grid as i32;
        let center = grid / 2;
        let mut snake: VecDeque<Point> = VecDeque::from(vec![
            Point { x: center, y: center },
            Point {
                x: center - 1,
                y: center,
            },
            Point {
                x: center - 2,
                y: center,
            },
        ]);
        let mut direction = Direction::Right;
        let mut score: i32 = 0;
        let mut food_eaten: u32 = 0;
        let mut current_speed = self.cfg.initial_speed_ms;
        let mut clock: i64 = 0;
        let mut food = place_food(seed, food_eaten, self.cfg.grid, &body(&snake));
        let mut move_idx = 0usize;
        let max_frame = total_frames.saturating_add(10).min(10_000);
        let mut frame_log = Vec::new();
        let mut food_events = Vec::new();
        let mut terminated_early = false;

        for frame in 1..=max_frame {
            clock += current_speed;

            while move_idx < moves.len() && moves[move_idx].frame == frame {
                let mv = moves[move_idx];
                move_idx += 1;
                if !mv.direction.is_inverse_of(direction) {
                    direction = mv.direction;
                }
            }

            let head = *snake.front().expect("snake never empties");
            let (dx, dy) = direction.delta();
            let new_head = Point {
                x: head.x + dx,
                y: head.y + dy,
            };

            if new_head.x < 0 || new_head.x >= grid || new_head.y < 0 || new_head.y >= grid {
                terminated_early = true;
                break;
            }
            if snake.contains(&new_head) {
                terminated_early = true;
                break;
            }

            snake.push_front(new_head);

            if new_head == food {
                score += 10;
                food_eaten += 1;
                food_events.push(FoodEvent {
                    frame,
                    score_after: score,
                });
                if food_eaten > MAX_FOOD_EATEN {
                    terminated_early = true;
                    break;
                }
                food = place_food(seed, food_eaten, self.cfg.grid, &body(&snake));
                current_speed = (current_speed - self.cfg.speed_increase_ms).max(self.cfg.min_speed_ms);
            } else {
                snake.pop_back();
            }

            if frame <= 5 || frame + 5 > max_frame {
                frame_log.push(FrameSnapshot {
                    frame,
                    head: new_head,
                    score,
                    food_eaten,
                });
            }
        }

        ReplayVerdict {
            final_score: score,
            final_food_eaten: food_eaten,
            simulated_duration_secs: clock / 1000,
            terminated_early,
            frame_log,
            food_events,
        }
    }
}

fn body(snake: &VecDeque<Point>) -> Vec<Point> {
    snake.iter().copied().collect()
}
