//! Guard against leaving the create form before it was saved.
//!
//! The first attempt to leave is refused and the form shows a warning; the
//! second attempt is let through. A successful save marks the form finished
//! before it navigates away, so the guard never interferes on that path.

/// A page that can be protected against being left.
pub trait Leavable {
    fn is_finished(&self) -> bool;
    fn set_finished(&mut self, finished: bool);
    fn set_show_warning(&mut self, show_warning: bool);
}

/// Decides whether the router may leave the current page.
pub trait CanDeactivate<C> {
    fn can_deactivate(&self, component: &mut C) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateGuard;

impl<C: Leavable> CanDeactivate<C> for CreateGuard {
    fn can_deactivate(&self, component: &mut C) -> bool {
        if component.is_finished() {
            return true;
        }

        component.set_show_warning(true);
        component.set_finished(true);
        tracing::warn!("CreateGuard::can_deactivate(): leaving unsaved page");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Page {
        finished: bool,
        show_warning: bool,
    }

    impl Leavable for Page {
        fn is_finished(&self) -> bool {
            self.finished
        }

        fn set_finished(&mut self, finished: bool) {
            self.finished = finished;
        }

        fn set_show_warning(&mut self, show_warning: bool) {
            self.show_warning = show_warning;
        }
    }

    #[test]
    fn test_first_attempt_is_refused_second_allowed() {
        let mut page = Page::default();

        assert!(!CreateGuard.can_deactivate(&mut page));
        assert!(page.finished);
        assert!(page.show_warning);

        assert!(CreateGuard.can_deactivate(&mut page));
    }

    #[test]
    fn test_finished_page_leaves_without_warning() {
        let mut page = Page {
            finished: true,
            show_warning: false,
        };

        assert!(CreateGuard.can_deactivate(&mut page));
        assert!(!page.show_warning);
    }
}
