// Gmail page bindings: MutationObserver watch, compose surface lookup and
// widget container insertion.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::mpsc;
use futures::Stream;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit, MutationRecord};

use super::assistant::ComposeSurface;
use super::observer::{ComposeHost, DomChange, SurfaceWatch};
use crate::config::ContentConfig;
use crate::error::{Error, Result};

fn js_error(value: JsValue) -> String {
    format!("{:?}", value)
}

/// Subtree mutations under one root element (normally `document.body`)
pub struct DomWatcher {
    root: Element,
}

impl DomWatcher {
    pub fn new(root: Element) -> Self {
        Self { root }
    }
}

impl SurfaceWatch for DomWatcher {
    type Changes = DomChanges;

    fn watch(&self) -> Result<DomChanges> {
        let (tx, rx) = mpsc::unbounded();

        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                let added_nodes = records
                    .iter()
                    .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                    .map(|record| record.added_nodes().length())
                    .sum();
                // receiver gone means the watch was dropped
                let _ = tx.unbounded_send(DomChange { added_nodes });
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| Error::Injection(js_error(e)))?;

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(&self.root, &init)
            .map_err(|e| Error::Injection(js_error(e)))?;

        log::debug!("Watching DOM for compose surfaces");
        Ok(DomChanges {
            rx,
            observer,
            _callback: callback,
        })
    }
}

/// Live mutation stream; dropping it disconnects the observer
pub struct DomChanges {
    rx: mpsc::UnboundedReceiver<DomChange>,
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Stream for DomChanges {
    type Item = DomChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<DomChange>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl Drop for DomChanges {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Mounts the widget UI into a freshly inserted container
pub type MountFn = fn(&Element) -> Result<()>;

pub struct DomHost {
    document: Document,
    config: ContentConfig,
    mount: MountFn,
}

impl DomHost {
    pub fn new(document: Document, config: ContentConfig, mount: MountFn) -> Self {
        Self {
            document,
            config,
            mount,
        }
    }
}

impl ComposeHost for DomHost {
    type Surface = Element;

    fn compose_surfaces(&self) -> Vec<Element> {
        let nodes = match self.document.query_selector_all(&self.config.compose_selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                log::error!("Bad compose selector {}: {}", self.config.compose_selector, js_error(e));
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn has_widget(&self, surface: &Element) -> bool {
        let marker = format!(".{}", self.config.container_class);
        surface
            .parent_element()
            .and_then(|parent| parent.query_selector(&marker).ok().flatten())
            .is_some()
    }

    fn attach_widget(&self, surface: &Element) -> Result<()> {
        let parent = surface
            .parent_element()
            .ok_or_else(|| Error::Injection("compose surface has no parent".to_string()))?;

        let container = self
            .document
            .create_element("div")
            .map_err(|e| Error::Injection(js_error(e)))?;
        container.set_class_name(&self.config.container_class);
        container
            .set_attribute(
                "style",
                "padding: 8px; border-bottom: 1px solid #ccc; background-color: #f8f9fa;",
            )
            .map_err(|e| Error::Injection(js_error(e)))?;

        parent
            .insert_before(&container, Some(surface))
            .map_err(|e| Error::Injection(js_error(e)))?;

        (self.mount)(&container)
    }
}

/// First compose surface on the page, looked up at write time
pub struct DomComposeSurface {
    document: Document,
    selector: String,
}

impl DomComposeSurface {
    pub fn new(document: Document, selector: impl Into<String>) -> Self {
        Self {
            document,
            selector: selector.into(),
        }
    }
}

impl ComposeSurface for DomComposeSurface {
    fn write_draft(&self, html: &str) -> Result<()> {
        let surface = self
            .document
            .query_selector(&self.selector)
            .map_err(|e| Error::Injection(js_error(e)))?
            .ok_or(Error::NoComposeSurface)?;
        surface.set_inner_html(html);
        Ok(())
    }
}
