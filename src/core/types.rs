//! Core type aliases and re-exports

use rand::Rng;

pub use glam::Vec2;

/// Standard Result type for the garden
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Uniform sample between `a` and `b`, in either order.
///
/// Never panics on an empty or reversed range, unlike `random_range`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    if a == b {
        return a;
    }
    a + (b - a) * rng.random::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_uniform_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 15.0, 40.0);
            assert!((15.0..=40.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_reversed_and_degenerate() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 15.0, 10.0);
            assert!((10.0..=15.0).contains(&v));
        }
        assert_eq!(uniform(&mut rng, 3.0, 3.0), 3.0);
    }
}
