//! Mirroring rendered frames into Slint models.
//!
//! Bind a `VecModel` once with a constructor for the host's row type, then
//! call `sync` with every new [`Frame`]. Rows are updated in place, so Slint
//! only re-evaluates bindings for rows that changed position.
//!
//! ```ignore
//! let edges = Rc::new(VecModel::<EdgeRow>::default());
//! let edge_sync = EdgePathSync::new(edges.clone(), |id, path, color, width| EdgeRow {
//!     id,
//!     path_commands: path,
//!     color: color.into(),
//!     width,
//! });
//! window.set_edges(ModelRc::from(edges));
//!
//! let frame = engine.borrow_mut().frame(elapsed);
//! edge_sync.sync(&frame);
//! window.set_grid_commands(frame.grid_commands().into());
//! ```

use crate::geometry::Rect;
use crate::render::Frame;
use slint::{Color, Model, SharedString, VecModel};
use std::rc::Rc;

/// Overwrite `model` with `rows`, reusing existing rows.
fn sync_rows<P: Clone + 'static>(model: &VecModel<P>, rows: impl IntoIterator<Item = P>) {
    let mut count = 0;
    for (i, item) in rows.into_iter().enumerate() {
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
        count = i + 1;
    }
    while model.row_count() > count {
        model.remove(model.row_count() - 1);
    }
}

/// Keeps a model of edge paths in step with rendered frames.
pub struct EdgePathSync<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> EdgePathSync<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, SharedString, Color, f32) -> P,
{
    /// `constructor` receives (edge id, SVG path commands, stroke color, stroke width).
    pub fn new(model: Rc<VecModel<P>>, constructor: F) -> Self {
        Self { model, constructor }
    }

    pub fn sync(&self, frame: &Frame) {
        sync_rows(
            &self.model,
            frame.edges().map(|e| {
                (self.constructor)(
                    SharedString::from(e.id.as_str()),
                    SharedString::from(e.path.as_str()),
                    e.color,
                    e.width,
                )
            }),
        );
    }

    pub fn model(&self) -> Rc<VecModel<P>> {
        self.model.clone()
    }
}

/// Keeps a model of node boxes in step with rendered frames.
pub struct NodeBoxSync<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> NodeBoxSync<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, Rect, Color, SharedString, bool) -> P,
{
    /// `constructor` receives (node id, screen rect, fill, label, selected).
    pub fn new(model: Rc<VecModel<P>>, constructor: F) -> Self {
        Self { model, constructor }
    }

    pub fn sync(&self, frame: &Frame) {
        sync_rows(
            &self.model,
            frame.nodes().map(|n| {
                (self.constructor)(
                    SharedString::from(n.id.as_str()),
                    n.rect,
                    n.fill,
                    SharedString::from(n.label.as_deref().unwrap_or_default()),
                    n.selected,
                )
            }),
        );
    }

    pub fn model(&self) -> Rc<VecModel<P>> {
        self.model.clone()
    }
}
