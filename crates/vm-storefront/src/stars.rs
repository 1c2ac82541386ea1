//! Star glyphs for a continuous rating. Full stars are the floor of the
//! rating; a remainder of at least one half adds a single half star.

pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Star {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Full => "fas fa-star",
            Self::Half => "fas fa-star-half-alt",
            Self::Empty => "far fa-star",
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Full => '★',
            Self::Half => '⯪',
            Self::Empty => '☆',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

impl StarRating {
    pub fn from_rating(rating: f64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, f64::from(MAX_STARS))
        } else {
            0.0
        };
        let full = rating.floor() as u8;
        let half = u8::from(full < MAX_STARS && rating.fract() >= 0.5);
        Self {
            full,
            half,
            empty: MAX_STARS - full - half,
        }
    }

    pub fn glyphs(&self) -> Vec<Star> {
        let mut glyphs = Vec::with_capacity(usize::from(MAX_STARS));
        glyphs.extend((0..self.full).map(|_| Star::Full));
        glyphs.extend((0..self.half).map(|_| Star::Half));
        glyphs.extend((0..self.empty).map(|_| Star::Empty));
        glyphs
    }

    /// Plain-text rendering for terminals.
    pub fn to_symbols(&self) -> String {
        self.glyphs().iter().map(Star::symbol).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_ratings_round_down_to_half_stars() {
        assert_eq!(
            StarRating::from_rating(3.7),
            StarRating { full: 3, half: 1, empty: 1 }
        );
        assert_eq!(
            StarRating::from_rating(4.5),
            StarRating { full: 4, half: 1, empty: 0 }
        );
        assert_eq!(
            StarRating::from_rating(4.49),
            StarRating { full: 4, half: 0, empty: 1 }
        );
    }

    #[test]
    fn out_of_range_ratings_are_clamped() {
        assert_eq!(StarRating::from_rating(7.0).glyphs(), vec![Star::Full; 5]);
        assert_eq!(StarRating::from_rating(-1.0).glyphs(), vec![Star::Empty; 5]);
        assert_eq!(StarRating::from_rating(f64::NAN).empty, 5);
    }

    #[test]
    fn glyphs_are_ordered_full_half_empty() {
        let glyphs = StarRating::from_rating(2.5).glyphs();
        assert_eq!(
            glyphs,
            vec![Star::Full, Star::Full, Star::Half, Star::Empty, Star::Empty]
        );
        assert_eq!(StarRating::from_rating(2.5).to_symbols(), "★★⯪☆☆");
    }
}
