//! Slides and the sequencing arithmetic that walks through them.
//!
//! A [`SlideSet`] is owned by the host and shared read-only with the engine.
//! Its identity (the shared allocation) is what the lifecycle manager compares
//! when deciding between a full restart and an in-place reconfiguration, so
//! hosts that want to keep the current position across a reload must hand the
//! same set back rather than an equal copy.

use std::sync::Arc;

use super::error::CarouselError;

/// One displayable item. The payload is opaque to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide<P> {
    pub id: String,
    pub payload: P,
}

impl<P> Slide<P> {
    pub fn new(id: impl Into<String>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// Ordered, immutable, cheaply clonable list of slides.
#[derive(Debug)]
pub struct SlideSet<P> {
    slides: Arc<[Slide<P>]>,
}

impl<P> Clone for SlideSet<P> {
    fn clone(&self) -> Self {
        Self {
            slides: Arc::clone(&self.slides),
        }
    }
}

impl<P> SlideSet<P> {
    pub fn new(slides: Vec<Slide<P>>) -> Self {
        Self {
            slides: slides.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide<P>> {
        self.slides.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide<P>> {
        self.slides.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slides.iter().map(|slide| slide.id.as_str())
    }

    /// True when both handles point at the same shared allocation.
    pub fn same_identity(&self, other: &SlideSet<P>) -> bool {
        Arc::ptr_eq(&self.slides, &other.slides)
    }
}

impl<P> From<Vec<Slide<P>>> for SlideSet<P> {
    fn from(slides: Vec<Slide<P>>) -> Self {
        Self::new(slides)
    }
}

impl<P: PartialEq> SlideSet<P> {
    /// Structural equality, independent of identity.
    pub fn same_content(&self, other: &SlideSet<P>) -> bool {
        self.slides[..] == other.slides[..]
    }
}

/// Index that follows `current` in a set of `slide_count` slides.
///
/// Wraps to 0 after the last slide. A single-slide set maps onto itself.
pub fn next_index(current: usize, slide_count: usize) -> Result<usize, CarouselError> {
    if slide_count == 0 {
        return Err(CarouselError::EmptySlideSet);
    }
    Ok((current + 1) % slide_count)
}

/// Advance one step: the next slide becomes current and a new next is computed.
pub fn advance(current: usize, slide_count: usize) -> Result<(usize, usize), CarouselError> {
    let current = next_index(current, slide_count)?;
    let next = next_index(current, slide_count)?;
    Ok((current, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> SlideSet<()> {
        ids.iter().map(|id| Slide::new(*id, ())).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_advance_wraps_after_last_slide() {
        assert_eq!(advance(0, 3), Ok((1, 2)));
        assert_eq!(advance(1, 3), Ok((2, 0)));
        assert_eq!(advance(2, 3), Ok((0, 1)));
    }

    #[test]
    fn test_single_slide_maps_onto_itself() {
        assert_eq!(advance(0, 1), Ok((0, 0)));
        assert_eq!(next_index(0, 1), Ok(0));
    }

    #[test]
    fn test_empty_set_is_an_error() {
        assert_eq!(advance(0, 0), Err(CarouselError::EmptySlideSet));
        assert_eq!(next_index(5, 0), Err(CarouselError::EmptySlideSet));
    }

    #[test]
    fn test_identity_survives_clone_but_not_rebuild() {
        let a = set(&["a", "b"]);
        let b = a.clone();
        let c = set(&["a", "b"]);

        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
        assert!(a.same_content(&c));
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let slides = set(&["summer", "winter", "autumn"]);
        let ids: Vec<&str> = slides.ids().collect();
        assert_eq!(ids, vec!["summer", "winter", "autumn"]);
        assert_eq!(slides.get(1).map(|s| s.id.as_str()), Some("winter"));
        assert!(slides.get(3).is_none());
    }
}
