//! Deterministic seeded RNG shared bit-for-bit with the browser client.
//! Reference algorithm: `fract(sin(n) * 10000)`. Do not touch the formula
//! without co-deploying the client; see spec's open question on this.

/// Stateless pseudo-random value in [0, 1) for a given integer input.
#[inline]
pub fn rand(n: i64) -> f64 {
    let x = (n as f64).sin() * 10_000.0;
    x - x.floor()
}

/// A point on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Places food deterministically from `(seed, food_eaten, k)`, advancing `k`
/// on every collision with the snake body until a free cell is found or
/// `grid * grid` attempts are exhausted (mirrors spec section 4.1).
pub fn place_food(seed: u32, food_eaten: u32, grid: u32, snake: &[Point]) -> Point {
    let mut k: i64 = 0;
    let max_attempts = (grid as i64) * (grid as i64);
    loop {
        let base = seed as i64 + food_eaten as i64 + k;
        let x = (rand(base) * grid as f64).floor() as i32;
        let y = (rand(base + 1) * grid as f64).floor() as i32;
        let candidate = Point { x, y };
        if !snake.contains(&candidate) || k >= max_attempts {
            return candidate;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rand_is_deterministic() {
        assert_eq!(rand(42), rand(42));
        assert_eq!(rand(1), rand(1));
    }

    #[test]
    fn rand_stays_in_unit_interval() {
        for n in 0..10_000 {
            let v = rand(n);
            assert!((0.0..1.0).contains(&v), "rand({n}) = {v} out of range");
        }
    }

    #[test]
    fn place_food_avoids_snake_body() {
        let snake = vec![Point { x: 15, y: 15 }, Point { x: 14, y: 15 }];
        let food = place_food(42, 0, 30, &snake);
        assert!(!snake.contains(&food) || {
            // only acceptable if every cell were occupied, which isn't the case here
            false
        });
    }

    #[test]
    fn place_food_is_deterministic_given_same_inputs() {
        let snake = vec![Point { x: 1, y: 1 }];
        let a = place_food(7, 3, 30, &snake);
        let b = place_food(7, 3, 30, &snake);
        assert_eq!(a, b);
    }

    proptest::proptest! {
        #[test]
        fn rand_always_in_unit_interval(n in any::<i32>()) {
            let v = rand(n as i64);
            proptest::prop_assert!((0.0..1.0).contains(&v));
        }

        #[test]
        fn place_food_is_deterministic_for_arbitrary_inputs(
            seed in any::<u32>(),
            food_eaten in 0u32..500,
            grid in 10u32..60,
        ) {
            let snake = vec![Point { x: 0, y: 0 }];
            let a = place_food(seed, food_eaten, grid, &snake);
            let b = place_food(seed, food_eaten, grid, &snake);
            proptest::prop_assert_eq!(a, b);
        }
    }
}
