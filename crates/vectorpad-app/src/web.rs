//! WebAssembly entry point and browser event wiring.

use crate::menu::ContextMenu;
use crate::svg::{HANDLE_CLASS, SHAPE_CLASS, SvgSurface};
use kurbo::Point;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;
use vectorpad_core::{
    Editor, EditorConfig, EditorError, HandleRef, MenuAction, Modifiers, Surface, Target, ToolKind,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent};

type SharedEditor = Rc<RefCell<Editor<SvgSurface>>>;

/// Install the panic hook and the console logger once per page.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"VectorPad: logger already initialized".into());
    }
    log::info!("VectorPad (WASM) loaded");
}

fn to_js(err: EditorError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Resolve what a DOM event landed on from the element's attributes.
fn target_of(event: &Event) -> Target {
    let Some(el) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return Target::Surface;
    };
    let class = el.get_attribute("class").unwrap_or_default();
    let has_class = |name: &str| class.split_whitespace().any(|c| c == name);

    if has_class(HANDLE_CLASS) {
        let owner = el
            .get_attribute("data-owner")
            .and_then(|v| Uuid::parse_str(&v).ok());
        let index = el
            .get_attribute("data-index")
            .and_then(|v| v.parse::<usize>().ok());
        if let (Some(owner), Some(index)) = (owner, index) {
            return Target::Handle(HandleRef::new(owner, index));
        }
    } else if has_class(SHAPE_CLASS) {
        if let Some(id) = el.get_attribute("id").and_then(|v| Uuid::parse_str(&v).ok()) {
            return Target::Shape(id);
        }
    }
    Target::Surface
}

fn modifiers_of(event: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
        space: false,
    }
}

/// Whether a key event is aimed at a text field elsewhere on the page.
fn is_editable_target(event: &Event) -> bool {
    let Some(el) = event.target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) else {
        return false;
    };
    el.is_content_editable() || matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

/// Re-read the rendered size of the `<svg>`; it may have had no layout yet.
fn sync_client_size(editor: &mut Editor<SvgSurface>) {
    let client = editor.surface().client_size();
    editor.resize_client(client);
}

/// Pointer position relative to the `<svg>` element, in CSS pixels.
fn local_point(svg: &Element, event: &MouseEvent) -> Point {
    let rect = svg.get_bounding_client_rect();
    Point::new(
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    )
}

/// An event listener kept alive until the editor is destroyed.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn Fn(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl Fn(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// A VectorPad editor bound to an `<svg>` element on the page.
#[wasm_bindgen]
pub struct VectorEditor {
    editor: SharedEditor,
    menu: Rc<RefCell<ContextMenu>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl VectorEditor {
    /// Bind to the `<svg>` matching `selector`. `config` is an optional
    /// object with editor settings.
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str, config: JsValue) -> Result<VectorEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| to_js(EditorError::Config(e.to_string())))?
        };
        config.validate().map_err(to_js)?;

        let surface = SvgSurface::attach(selector, config.handle_radius).map_err(to_js)?;
        let svg = surface.svg().clone();
        let client = surface.client_size();

        let dom = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| to_js(EditorError::InvalidSurfaceTarget("no document".to_string())))?;
        let menu = Rc::new(RefCell::new(ContextMenu::new(&dom)?));

        let mut editor = Editor::new(surface, config);
        editor.resize_client(client);
        let editor = Rc::new(RefCell::new(editor));

        let listeners = Self::wire(&editor, &menu, &svg)?;
        log::info!("VectorPad editor ready on {selector}");
        Ok(Self {
            editor,
            menu,
            listeners,
        })
    }

    fn wire(
        editor: &SharedEditor,
        menu: &Rc<RefCell<ContextMenu>>,
        svg: &Element,
    ) -> Result<Vec<Listener>, JsValue> {
        let window: EventTarget = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .into();
        let svg_target: &EventTarget = svg.as_ref();
        let mut listeners = Vec::new();

        let (ed, mn, el) = (editor.clone(), menu.clone(), svg.clone());
        listeners.push(Listener::attach(svg_target, "mousedown", move |e| {
            let Some(mouse) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Ok(mut menu) = mn.try_borrow_mut() {
                menu.hide();
            }
            if mouse.button() != 0 {
                return;
            }
            if let Ok(mut editor) = ed.try_borrow_mut() {
                sync_client_size(&mut editor);
                editor.pointer_down(target_of(&e), local_point(&el, mouse));
            }
        })?);

        let (ed, el) = (editor.clone(), svg.clone());
        listeners.push(Listener::attach(svg_target, "mousemove", move |e| {
            let Some(mouse) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Ok(mut editor) = ed.try_borrow_mut() {
                editor.pointer_move(local_point(&el, mouse), modifiers_of(mouse));
            }
        })?);

        let (ed, el) = (editor.clone(), svg.clone());
        listeners.push(Listener::attach(svg_target, "mouseup", move |e| {
            let Some(mouse) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            if mouse.button() != 0 {
                return;
            }
            if let Ok(mut editor) = ed.try_borrow_mut() {
                editor.pointer_up(target_of(&e), local_point(&el, mouse));
            }
        })?);

        let ed = editor.clone();
        listeners.push(Listener::attach(svg_target, "mouseleave", move |_e| {
            if let Ok(mut editor) = ed.try_borrow_mut() {
                editor.pointer_cancel();
            }
        })?);

        let (ed, mn, el) = (editor.clone(), menu.clone(), svg.clone());
        listeners.push(Listener::attach(svg_target, "contextmenu", move |e| {
            e.prevent_default();
            let Some(mouse) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            let entries = match ed.try_borrow() {
                Ok(editor) => editor.context_menu(target_of(&e), local_point(&el, mouse)),
                Err(_) => return,
            };
            let ed = ed.clone();
            let on_select: Rc<dyn Fn(MenuAction)> = Rc::new(move |action| {
                if let Ok(mut editor) = ed.try_borrow_mut() {
                    editor.handle_menu_action(action);
                }
            });
            if let Ok(mut menu) = mn.try_borrow_mut() {
                let (x, y) = (mouse.client_x() as f64, mouse.client_y() as f64);
                if let Err(err) = menu.show(entries, x, y, on_select) {
                    log::error!("Cannot show context menu: {err:?}");
                }
            }
        })?);

        let (ed, el) = (editor.clone(), svg.clone());
        listeners.push(Listener::attach(svg_target, "wheel", move |e| {
            let Some(wheel) = e.dyn_ref::<WheelEvent>() else {
                return;
            };
            e.prevent_default();
            if let Ok(mut editor) = ed.try_borrow_mut() {
                editor.wheel(local_point(&el, wheel), wheel.delta_y());
            }
        })?);

        let ed = editor.clone();
        listeners.push(Listener::attach(&window, "keydown", move |e| {
            let Some(key) = e.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if is_editable_target(&e) {
                return;
            }
            let modifiers = Modifiers {
                shift: key.shift_key(),
                ctrl: key.ctrl_key(),
                alt: key.alt_key(),
                meta: key.meta_key(),
                space: false,
            };
            if let Ok(mut editor) = ed.try_borrow_mut() {
                if editor.key_down(&key.key(), modifiers) {
                    e.prevent_default();
                }
            }
        })?);

        let ed = editor.clone();
        listeners.push(Listener::attach(&window, "keyup", move |e| {
            if let (Some(key), Ok(mut editor)) = (e.dyn_ref::<KeyboardEvent>(), ed.try_borrow_mut()) {
                editor.key_up(&key.key());
            }
        })?);

        let ed = editor.clone();
        listeners.push(Listener::attach(&window, "resize", move |_e| {
            if let Ok(mut editor) = ed.try_borrow_mut() {
                sync_client_size(&mut editor);
            }
        })?);

        Ok(listeners)
    }

    /// Select a tool by name (`line`, `rect`, `polygon`, `select`); any other
    /// value clears the tool.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) {
        let tool = ToolKind::from_name(name);
        self.editor.borrow_mut().set_tool(tool);
    }

    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> Option<String> {
        self.editor.borrow().tool().map(|t| t.name().to_string())
    }

    pub fn undo(&self) -> bool {
        self.editor.borrow_mut().undo()
    }

    pub fn redo(&self) -> bool {
        self.editor.borrow_mut().redo()
    }

    /// Debug name of the current interaction state.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        format!("{:?}", self.editor.borrow().state())
    }

    #[wasm_bindgen(js_name = shapeCount)]
    pub fn shape_count(&self) -> usize {
        self.editor.borrow().surface().shape_ids().len()
    }

    /// Remove all listeners and the elements this editor added.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        self.menu.borrow_mut().destroy();
        self.editor.borrow_mut().surface_mut().detach();
        log::info!("VectorPad editor destroyed");
    }
}
