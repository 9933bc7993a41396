//! SVG surface: mirrors the editor's shapes and handles into DOM elements.

use kurbo::{Rect, Size};
use std::collections::HashMap;
use vectorpad_core::geometry::format_points;
use vectorpad_core::shapes::css_color;
use vectorpad_core::{Document, EditorError, EditorResult, Handle, Shape, ShapeId, Surface};
use web_sys::{Document as DomDocument, Element};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Class on every shape element.
pub const SHAPE_CLASS: &str = "shape";
/// Class on every handle circle.
pub const HANDLE_CLASS: &str = "handle";

fn set(el: &Element, name: &str, value: &str) {
    if let Err(err) = el.set_attribute(name, value) {
        log::warn!("Failed to set {name}={value}: {err:?}");
    }
}

/// A [`Surface`] backed by an `<svg>` element.
///
/// Geometry lives in the inner [`Document`]; elements are kept in sync
/// through the surface notification hooks. Shapes and handles are drawn in
/// separate groups so handles always stay on top.
pub struct SvgSurface {
    document: Document,
    dom: DomDocument,
    svg: Element,
    shape_layer: Element,
    handle_layer: Element,
    elements: HashMap<ShapeId, Element>,
    handle_radius: f64,
}

impl SvgSurface {
    /// Bind to the `<svg>` element matching `selector`.
    pub fn attach(selector: &str, handle_radius: f64) -> EditorResult<Self> {
        let invalid = |reason: String| EditorError::InvalidSurfaceTarget(reason);

        let dom = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| invalid("no document available".to_string()))?;
        let svg = dom
            .query_selector(selector)
            .map_err(|_| invalid(format!("bad selector {selector:?}")))?
            .ok_or_else(|| invalid(format!("nothing matches {selector:?}")))?;
        if !svg.tag_name().eq_ignore_ascii_case("svg") {
            return Err(invalid(format!(
                "{selector:?} is a <{}>, not an <svg>",
                svg.tag_name()
            )));
        }

        let layer = |class: &str| -> EditorResult<Element> {
            let group = dom
                .create_element_ns(Some(SVG_NS), "g")
                .map_err(|e| invalid(format!("cannot create layer: {e:?}")))?;
            set(&group, "class", class);
            svg.append_child(&group)
                .map_err(|e| invalid(format!("cannot append layer: {e:?}")))?;
            Ok(group)
        };
        let shape_layer = layer("vectorpad-shapes")?;
        let handle_layer = layer("vectorpad-handles")?;

        log::info!("Attached to {selector}");
        Ok(Self {
            document: Document::new(),
            dom,
            svg,
            shape_layer,
            handle_layer,
            elements: HashMap::new(),
            handle_radius,
        })
    }

    pub fn svg(&self) -> &Element {
        &self.svg
    }

    /// Rendered size of the `<svg>` element in CSS pixels.
    pub fn client_size(&self) -> Size {
        let rect = self.svg.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    /// Remove the layers this surface added.
    pub fn detach(&mut self) {
        self.shape_layer.remove();
        self.handle_layer.remove();
        self.elements.clear();
        log::info!("Detached SVG surface");
    }

    fn create_element(&self, shape: &Shape) -> Option<Element> {
        let tag = match shape {
            Shape::Line(_) => "line",
            Shape::Rect(_) => "rect",
            Shape::Polygon(_) => "polygon",
        };
        match self.dom.create_element_ns(Some(SVG_NS), tag) {
            Ok(el) => {
                set(&el, "id", &shape.id().to_string());
                let class = if shape.is_marquee() {
                    format!("{SHAPE_CLASS} marquee")
                } else {
                    SHAPE_CLASS.to_string()
                };
                set(&el, "class", &class);
                Some(el)
            }
            Err(err) => {
                log::error!("Cannot create <{tag}>: {err:?}");
                None
            }
        }
    }

    fn sync(&self, id: ShapeId) {
        let (Some(el), Some(shape)) = (self.elements.get(&id), self.document.shape(id)) else {
            return;
        };
        match shape {
            Shape::Line(line) => {
                set(el, "x1", &line.start.x.to_string());
                set(el, "y1", &line.start.y.to_string());
                set(el, "x2", &line.end.x.to_string());
                set(el, "y2", &line.end.y.to_string());
            }
            Shape::Rect(rect) => {
                set(el, "x", &rect.position.x.to_string());
                set(el, "y", &rect.position.y.to_string());
                set(el, "width", &rect.width.to_string());
                set(el, "height", &rect.height.to_string());
            }
            Shape::Polygon(poly) => set(el, "points", &format_points(&poly.points)),
        }

        let style = shape.style();
        set(el, "stroke", &css_color(style.stroke()));
        set(el, "stroke-width", &style.stroke_width.to_string());
        set(el, "fill", &css_color(style.fill_with_opacity()));
    }

    fn render_handle(&self, handle: &Handle) -> Option<Element> {
        let el = match self.dom.create_element_ns(Some(SVG_NS), "circle") {
            Ok(el) => el,
            Err(err) => {
                log::error!("Cannot create handle: {err:?}");
                return None;
            }
        };
        set(&el, "class", HANDLE_CLASS);
        set(&el, "data-owner", &handle.owner.to_string());
        set(&el, "data-index", &handle.index.to_string());
        set(&el, "cx", &handle.position.x.to_string());
        set(&el, "cy", &handle.position.y.to_string());
        set(&el, "r", &self.handle_radius.to_string());
        set(&el, "fill", "white");
        set(&el, "stroke", "black");
        if handle.hidden {
            set(&el, "opacity", "0");
        }
        Some(el)
    }
}

impl Surface for SvgSurface {
    fn insert_shape(&mut self, shape: Shape) {
        let id = shape.id();
        self.document.insert_shape(shape);

        let el = match self.elements.get(&id) {
            Some(el) => Some(el.clone()),
            None => self.document.shape(id).and_then(|s| self.create_element(s)),
        };
        if let Some(el) = el {
            // Appending an attached node moves it to the top.
            if let Err(err) = self.shape_layer.append_child(&el) {
                log::error!("Cannot append shape {id}: {err:?}");
            }
            self.elements.insert(id, el);
            self.sync(id);
        }
    }

    fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        if let Some(el) = self.elements.remove(&id) {
            el.remove();
        }
        self.document.remove_shape(id)
    }

    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.document.shape(id)
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.document.shape_mut(id)
    }

    fn shape_ids(&self) -> Vec<ShapeId> {
        self.document.shape_ids()
    }

    fn shape_updated(&mut self, id: ShapeId) {
        self.sync(id);
    }

    fn handles_changed(&mut self, handles: &[Handle]) {
        self.handle_layer.set_inner_html("");
        for handle in handles {
            if let Some(el) = self.render_handle(handle) {
                if let Err(err) = self.handle_layer.append_child(&el) {
                    log::error!("Cannot append handle: {err:?}");
                }
            }
        }
    }

    fn view_changed(&mut self, view_box: Rect) {
        let value = format!(
            "{} {} {} {}",
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height()
        );
        set(&self.svg, "viewBox", &value);
    }
}
