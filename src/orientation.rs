//! The engine's `(asset, numeraire)` vocabulary is written once; everywhere
//! it needs to talk to the AMM's `(amount_0, amount_1)` / `(currency0,
//! currency1)` vocabulary it goes through `Orientation`, so no C2-C6 logic
//! ever branches on `is_token_0` directly.
//!
//! (See spec.md's open question about a commented-out `amount1`/`amount0`
//! swap in the non-`is_token_0` branch of the original: this type is the
//! resolution, recorded rather than silently patched over — see DESIGN.md.)

/// Which pool token the asset being sold is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The asset is token_0; the numeraire is token_1.
    AssetIsToken0,
    /// The asset is token_1; the numeraire is token_0.
    AssetIsToken1,
}

impl Orientation {
    pub fn new(is_token_0: bool) -> Self {
        if is_token_0 {
            Orientation::AssetIsToken0
        } else {
            Orientation::AssetIsToken1
        }
    }

    pub fn is_token_0(self) -> bool {
        matches!(self, Orientation::AssetIsToken0)
    }

    /// `(asset, numeraire)` -> `(amount_0, amount_1)`.
    pub fn to_0_1<T: Copy>(self, asset: T, numeraire: T) -> (T, T) {
        match self {
            Orientation::AssetIsToken0 => (asset, numeraire),
            Orientation::AssetIsToken1 => (numeraire, asset),
        }
    }

    /// `(amount_0, amount_1)` -> `(asset, numeraire)`.
    pub fn from_0_1<T: Copy>(self, amount_0: T, amount_1: T) -> (T, T) {
        match self {
            Orientation::AssetIsToken0 => (amount_0, amount_1),
            Orientation::AssetIsToken1 => (amount_1, amount_0),
        }
    }

    /// Sign applied to tick deltas so "toward end_tick" always means
    /// "the asset becomes more expensive", independent of which token it is.
    pub fn direction_sign(self) -> i32 {
        match self {
            Orientation::AssetIsToken0 => -1,
            Orientation::AssetIsToken1 => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_both_orientations() {
        for o in [Orientation::AssetIsToken0, Orientation::AssetIsToken1] {
            let (a0, a1) = o.to_0_1(7, 9);
            assert_eq!(o.from_0_1(a0, a1), (7, 9));
        }
    }
}
