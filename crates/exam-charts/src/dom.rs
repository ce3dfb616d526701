//! Surface host backed by a DOM container
//!
//! Each surface is a wrapper `<div>` appended to the container with a
//! [`SurfaceChart`] mounted inside it. Dropping the mount handle disposes the
//! component's reactive owner, which releases its signals and event listeners.

use std::any::Any;

use crate::{
    line_chart::SurfaceChart,
    pool::SurfaceHost,
    surface::{SurfaceConfig, SurfaceSpec},
};
use exam_core::{ChartError, ChartResult};
use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

/// One mounted surface
pub struct MountedSurface {
    node: HtmlElement,
    // Leptos unmount handle; dropping it unmounts the view
    mount: Box<dyn Any>,
}

pub struct DomSurfaceHost {
    container: HtmlElement,
    config: SurfaceConfig,
}

impl DomSurfaceHost {
    pub fn new(container: HtmlElement, config: SurfaceConfig) -> Self {
        Self { container, config }
    }

    fn wrapper(&self, spec: &SurfaceSpec) -> ChartResult<HtmlElement> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| ChartError::Surface("container is detached from a document".into()))?;

        let node: HtmlElement = document
            .create_element("div")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ChartError::Surface("created node is not an HTML element".into()))?;

        node.set_id(&spec.id());
        node.set_class_name(&format!("chart-surface {}", spec.mode.css_class()));
        node.style()
            .set_property("width", self.config.css_width)
            .map_err(js_error)?;
        node.style()
            .set_property("height", &format!("{}px", spec.height()))
            .map_err(js_error)?;

        self.container.append_child(&node).map_err(js_error)?;
        Ok(node)
    }
}

impl SurfaceHost for DomSurfaceHost {
    type Handle = MountedSurface;

    fn create(&mut self, spec: &SurfaceSpec) -> ChartResult<MountedSurface> {
        let node = self.wrapper(spec)?;

        let spec = spec.clone();
        let config = self.config.clone();
        let handle = leptos::mount::mount_to(node.clone(), move || {
            view! { <SurfaceChart spec=spec config=config /> }
        });

        tracing::trace!("Mounted surface {}", node.id());
        Ok(MountedSurface {
            node,
            mount: Box::new(handle),
        })
    }

    fn destroy(&mut self, surface: MountedSurface) -> ChartResult<()> {
        let MountedSurface { node, mount } = surface;
        drop(mount);
        node.remove();
        Ok(())
    }

    fn clear_container(&mut self) -> ChartResult<()> {
        self.container.set_inner_html("");
        if self.container.child_element_count() > 0 {
            return Err(ChartError::Surface("chart container still has children".into()));
        }
        Ok(())
    }
}

fn js_error(value: JsValue) -> ChartError {
    ChartError::Surface(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}
