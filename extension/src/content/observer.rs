// Compose-surface injection.
//
// A watch yields one `DomChange` per mutation batch. The injector is the
// single subscriber: on every batch that added nodes it re-scans the page
// and attaches a widget to each surface that does not carry one yet. The
// marker lives in the page itself (the container next to the surface), so
// a surface that re-renders without it simply gets a new widget.

use futures::{Stream, StreamExt};

use crate::error::Result;

/// One batch of DOM mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomChange {
    pub added_nodes: u32,
}

/// Source of DOM change notifications. Every call to `watch` starts a
/// fresh, independent stream; dropping the stream stops watching.
pub trait SurfaceWatch {
    type Changes: Stream<Item = DomChange> + Unpin;

    fn watch(&self) -> Result<Self::Changes>;
}

/// The page hosting compose surfaces
pub trait ComposeHost {
    type Surface;

    /// Every compose surface currently in the document
    fn compose_surfaces(&self) -> Vec<Self::Surface>;

    /// Marker check: is a widget already attached to this surface
    fn has_widget(&self, surface: &Self::Surface) -> bool;

    /// Insert the widget container before the surface and mount the widget
    fn attach_widget(&self, surface: &Self::Surface) -> Result<()>;
}

pub struct Injector<H> {
    host: H,
    attached: usize,
}

impl<H: ComposeHost> Injector<H> {
    pub fn new(host: H) -> Self {
        Self { host, attached: 0 }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Widgets attached over the injector's lifetime
    pub fn attached(&self) -> usize {
        self.attached
    }

    /// Attach to every unmarked surface; returns how many were attached
    pub fn scan(&mut self) -> usize {
        let mut attached = 0;
        for surface in self.host.compose_surfaces() {
            if self.host.has_widget(&surface) {
                continue;
            }
            match self.host.attach_widget(&surface) {
                Ok(()) => attached += 1,
                Err(e) => log::warn!("Skipping compose surface: {}", e),
            }
        }
        if attached > 0 {
            self.attached += attached;
            log::info!("Attached assistant to {} compose surface(s)", attached);
        }
        attached
    }

    /// Scan once, then again after every batch that added nodes.
    /// Runs until the stream ends, which for a live page is never.
    pub async fn run<W>(mut self, mut changes: W) -> Self
    where
        W: Stream<Item = DomChange> + Unpin,
    {
        self.scan();
        while let Some(change) = changes.next().await {
            if change.added_nodes > 0 {
                self.scan();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use futures::executor::block_on;
    use futures::stream;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakePage {
        // (surface id, has marker)
        surfaces: RefCell<Vec<(u32, bool)>>,
        attach_calls: RefCell<Vec<u32>>,
        broken: RefCell<Vec<u32>>,
    }

    impl FakePage {
        fn add_surface(&self, id: u32) {
            self.surfaces.borrow_mut().push((id, false));
        }
    }

    impl ComposeHost for &FakePage {
        type Surface = u32;

        fn compose_surfaces(&self) -> Vec<u32> {
            self.surfaces.borrow().iter().map(|(id, _)| *id).collect()
        }

        fn has_widget(&self, surface: &u32) -> bool {
            self.surfaces
                .borrow()
                .iter()
                .any(|(id, marked)| id == surface && *marked)
        }

        fn attach_widget(&self, surface: &u32) -> Result<()> {
            self.attach_calls.borrow_mut().push(*surface);
            if self.broken.borrow().contains(surface) {
                return Err(Error::Injection(format!("surface {} has no parent", surface)));
            }
            for entry in self.surfaces.borrow_mut().iter_mut() {
                if entry.0 == *surface {
                    entry.1 = true;
                }
            }
            Ok(())
        }
    }

    fn changes(batches: &[u32]) -> impl Stream<Item = DomChange> + Unpin {
        stream::iter(
            batches
                .iter()
                .map(|n| DomChange { added_nodes: *n })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_repeated_notifications_attach_once() {
        let page = FakePage::default();
        page.add_surface(1);

        let injector = block_on(Injector::new(&page).run(changes(&[1, 3, 2, 1])));
        assert_eq!(injector.attached(), 1);
        assert_eq!(*page.attach_calls.borrow(), vec![1]);
    }

    #[test]
    fn test_new_surfaces_are_picked_up_on_rescan() {
        let page = FakePage::default();
        let mut injector = Injector::new(&page);
        assert_eq!(injector.scan(), 0);

        page.add_surface(1);
        page.add_surface(2);
        assert_eq!(injector.scan(), 2);

        page.add_surface(3);
        assert_eq!(injector.scan(), 1);
        assert_eq!(injector.scan(), 0);
        assert_eq!(*page.attach_calls.borrow(), vec![1, 2, 3]);
        assert_eq!(injector.attached(), 3);
    }

    #[test]
    fn test_batches_without_added_nodes_do_not_scan() {
        let page = FakePage::default();
        // the surface shows up after the initial scan, but the batches that
        // follow only carry attribute changes
        let batches = changes(&[0, 0]).inspect(|_| {
            if page.surfaces.borrow().is_empty() {
                page.add_surface(7);
            }
        });

        let injector = block_on(Injector::new(&page).run(batches));
        assert_eq!(page.surfaces.borrow().len(), 1);
        assert_eq!(injector.attached(), 0);
        assert!(page.attach_calls.borrow().is_empty());
    }

    #[test]
    fn test_failed_attach_is_retried_on_next_batch() {
        let page = FakePage::default();
        page.add_surface(1);
        page.broken.borrow_mut().push(1);

        let mut injector = Injector::new(&page);
        assert_eq!(injector.scan(), 0);

        page.broken.borrow_mut().clear();
        assert_eq!(injector.scan(), 1);
        assert_eq!(*page.attach_calls.borrow(), vec![1, 1]);
    }

    #[test]
    fn test_surface_losing_its_marker_is_reattached() {
        let page = FakePage::default();
        page.add_surface(1);
        let mut injector = Injector::new(&page);
        injector.scan();

        // Gmail re-rendered the compose body without our container
        page.surfaces.borrow_mut()[0].1 = false;
        assert_eq!(injector.scan(), 1);
    }
}
