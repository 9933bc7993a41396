//! DOM context menu for polygon editing.

use std::rc::Rc;
use vectorpad_core::{MenuAction, MenuEntry};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement};

/// A floating `<div>` with one button per menu entry.
pub struct ContextMenu {
    dom: Document,
    root: HtmlElement,
    /// Click handlers of the buttons currently shown.
    actions: Vec<Closure<dyn Fn(Event)>>,
}

impl ContextMenu {
    pub fn new(dom: &Document) -> Result<Self, JsValue> {
        let root: HtmlElement = dom.create_element("div")?.dyn_into()?;
        root.set_class_name("vectorpad-menu");
        let style = root.style();
        style.set_property("position", "fixed")?;
        style.set_property("display", "none")?;
        style.set_property("z-index", "1000")?;

        let body = dom
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&root)?;

        Ok(Self {
            dom: dom.clone(),
            root,
            actions: Vec::new(),
        })
    }

    /// Show `entries` at client coordinates `(x, y)`. Choosing an entry hides
    /// the menu and passes its action to `on_select`. An empty list hides it.
    pub fn show(
        &mut self,
        entries: Vec<MenuEntry>,
        x: f64,
        y: f64,
        on_select: Rc<dyn Fn(MenuAction)>,
    ) -> Result<(), JsValue> {
        self.hide();
        if entries.is_empty() {
            return Ok(());
        }

        for entry in entries {
            let button: HtmlElement = self.dom.create_element("button")?.dyn_into()?;
            button.set_text_content(Some(entry.label));
            button.style().set_property("display", "block")?;

            let root = self.root.clone();
            let on_select = on_select.clone();
            let action = entry.action;
            let on_click = Closure::wrap(Box::new(move |_e: Event| {
                let _ = root.style().set_property("display", "none");
                on_select(action);
            }) as Box<dyn Fn(Event)>);
            button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

            self.root.append_child(&button)?;
            self.actions.push(on_click);
        }

        let style = self.root.style();
        style.set_property("left", &format!("{x}px"))?;
        style.set_property("top", &format!("{y}px"))?;
        style.set_property("display", "block")?;
        Ok(())
    }

    pub fn hide(&mut self) {
        let _ = self.root.style().set_property("display", "none");
        self.root.set_inner_html("");
        self.actions.clear();
    }

    /// Remove the menu from the page.
    pub fn destroy(&mut self) {
        self.hide();
        self.root.remove();
    }
}
