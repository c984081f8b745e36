//! Browser page: binds the controller to a scrollable `#word-list` element.
//!
//! The controller lives in a thread-local cell; scroll and resize listeners
//! dispatch into it. Each scroll sample schedules a `setTimeout` quiet check
//! carrying that sample's sequence token, so only the last one of a gesture
//! can declare a stop.

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, window};

use crate::catalog::WordCatalog;
use crate::config::ForceConfig;
use crate::controller::{Controller, Event, Outcome};
use crate::random::entropy_seed;
use crate::session::ArmCommand;
use crate::surface::{RenderedItem, Surface};
use crate::viewport::{ItemExtent, ItemId};

const LIST_ID: &str = "word-list";
const ITEM_CLASS: &str = "word-item";

/// `Surface` backed by `<li>` children of the list element.
struct DomSurface {
    doc: Document,
    list: HtmlElement,
}

impl DomSurface {
    fn element_for(&self, id: ItemId) -> Option<Element> {
        self.list
            .query_selector(&format!("[data-id=\"{}\"]", id.0))
            .ok()
            .flatten()
    }

    fn id_of(el: &Element) -> Option<ItemId> {
        el.get_attribute("data-id")?.parse().ok().map(ItemId)
    }

    fn try_append(&self, items: &[RenderedItem]) -> Result<(), JsValue> {
        for item in items {
            let li = self.doc.create_element("li")?;
            li.set_class_name(ITEM_CLASS);
            li.set_attribute("data-id", &item.id.0.to_string())?;
            li.set_text_content(Some(&item.text));
            self.list.append_child(&li)?;
        }
        Ok(())
    }

    fn apply_marks(el: &Element, item: &RenderedItem) -> Result<(), JsValue> {
        let classes = el.class_list();
        classes.toggle_with_force("forced", item.forced)?;
        classes.toggle_with_force("revealed", item.revealed)?;
        Ok(())
    }

    fn center_middle_item(&self) {
        let children = self.list.children();
        let Some(el) = children.item(children.length() / 2) else {
            return;
        };
        let Ok(item) = el.dyn_into::<HtmlElement>() else {
            return;
        };
        let top = f64::from(item.offset_top()) + f64::from(item.offset_height()) / 2.0
            - f64::from(self.list.client_height()) / 2.0;
        self.list.scroll_to_with_x_and_y(0.0, top.max(0.0));
    }
}

impl Surface for DomSurface {
    fn viewport_center(&self) -> f64 {
        window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
            / 2.0
    }

    fn item_extents(&self) -> Vec<ItemExtent> {
        let children = self.list.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|el| {
                let id = Self::id_of(&el)?;
                let rect = el.get_bounding_client_rect();
                Some(ItemExtent {
                    id,
                    top: rect.top(),
                    height: rect.height(),
                })
            })
            .collect()
    }

    fn tail_distance(&self) -> f64 {
        f64::from(self.list.scroll_height())
            - f64::from(self.list.scroll_top())
            - f64::from(self.list.client_height())
    }

    fn append(&mut self, items: &[RenderedItem]) {
        if let Err(e) = self.try_append(items) {
            warn!("append failed: {e:?}");
        }
    }

    fn rewrite(&mut self, item: &RenderedItem) {
        let Some(el) = self.element_for(item.id) else {
            return;
        };
        if el.text_content().as_deref() != Some(item.text.as_str()) {
            el.set_text_content(Some(&item.text));
        }
        if let Err(e) = Self::apply_marks(&el, item) {
            warn!("marking failed: {e:?}");
        }
    }

    fn remove_after(&mut self, id: ItemId) {
        while let Some(last) = self.list.last_element_child() {
            match Self::id_of(&last) {
                Some(last_id) if last_id > id => last.remove(),
                _ => break,
            }
        }
    }

    fn highlight(&mut self, id: Option<ItemId>) {
        if let Ok(Some(prev)) = self.list.query_selector(".word-item.active") {
            if let Err(e) = prev.class_list().remove_1("active") {
                warn!("unhighlight failed: {e:?}");
            }
        }
        if let Some(el) = id.and_then(|id| self.element_for(id)) {
            if let Err(e) = el.class_list().add_1("active") {
                warn!("highlight failed: {e:?}");
            }
        }
    }
}

thread_local! {
    static PAGE: std::cell::RefCell<Option<Controller<DomSurface>>> = const { std::cell::RefCell::new(None) };
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(feature = "serde_json")]
fn load_catalog(json: Option<String>) -> WordCatalog {
    match json.map(|j| WordCatalog::from_json(&j)) {
        Some(Ok(catalog)) => catalog,
        Some(Err(e)) => {
            warn!("{e}; using the built-in word list");
            crate::sample_catalog()
        }
        None => crate::sample_catalog(),
    }
}

#[cfg(not(feature = "serde_json"))]
fn load_catalog(_json: Option<String>) -> WordCatalog {
    crate::sample_catalog()
}

#[cfg(feature = "serde_json")]
fn load_config(json: Option<String>) -> ForceConfig {
    match json.map(|j| ForceConfig::from_json(&j)) {
        Some(Ok(cfg)) => cfg,
        Some(Err(e)) => {
            warn!("{e}; using default tuning");
            ForceConfig::default()
        }
        None => ForceConfig::default(),
    }
}

#[cfg(not(feature = "serde_json"))]
fn load_config(_json: Option<String>) -> ForceConfig {
    ForceConfig::default()
}

fn schedule_quiet_check(token: u64, delay_ms: f64) {
    let Some(win) = window() else {
        return;
    };
    let callback = Closure::once_into_js(move || {
        PAGE.with(|cell| {
            if let Some(page) = cell.borrow_mut().as_mut() {
                if let Outcome::Stopped(outcome) = page.dispatch(Event::QuietCheck { token }) {
                    log::debug!("stop: {outcome:?}");
                }
            }
        });
    });
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms.ceil() as i32,
    );
}

/// Build the list inside `#word-list` and start listening to scrolling.
/// `catalog_json` is a word array or an indexed catalog object; both
/// arguments fall back to built-in defaults when absent or invalid.
#[wasm_bindgen]
pub fn start_page(catalog_json: Option<String>, config_json: Option<String>) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let list: HtmlElement = doc
        .get_element_by_id(LIST_ID)
        .ok_or_else(|| JsValue::from_str("no #word-list element"))?
        .dyn_into()?;
    list.set_inner_html("");

    let catalog = load_catalog(catalog_json);
    let config = load_config(config_json);
    info!("starting with {} words", catalog.len());

    let mut page = Controller::new(
        catalog,
        config,
        entropy_seed(),
        DomSurface {
            doc: doc.clone(),
            list: list.clone(),
        },
    );
    page.start();
    page.surface().center_middle_item();
    page.dispatch(Event::Resize);
    PAGE.with(|cell| *cell.borrow_mut() = Some(page));

    // Scroll samples
    {
        let list_scroll = list.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let offset = f64::from(list_scroll.scroll_top());
            let scheduled = PAGE.with(|cell| {
                cell.borrow_mut().as_mut().and_then(|page| {
                    match page.dispatch(Event::Scroll {
                        at_ms: now_ms(),
                        offset,
                    }) {
                        Outcome::Sampled(report) => {
                            Some((report.token, page.config().quiet_window_ms))
                        }
                        _ => None,
                    }
                })
            });
            if let Some((token, delay)) = scheduled {
                schedule_quiet_check(token, delay);
            }
        }) as Box<dyn FnMut(_)>);
        list.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize keeps the highlight on the centered item
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            PAGE.with(|cell| {
                if let Some(page) = cell.borrow_mut().as_mut() {
                    page.dispatch(Event::Resize);
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Arm a forcing session from the operator form. Returns false (and changes
/// nothing) for an empty word or an invalid rank.
#[wasm_bindgen]
pub fn arm_forcing(target_word: &str, rank: Option<u32>, reveal_after_stops: Option<u32>) -> bool {
    let command = ArmCommand {
        target_word: target_word.to_string(),
        rank,
        reveal_after_stops,
    };
    PAGE.with(|cell| {
        cell.borrow_mut().as_mut().is_some_and(|page| {
            matches!(page.dispatch(Event::Arm(command)), Outcome::Armed(Ok(())))
        })
    })
}

#[wasm_bindgen]
pub fn reset_forcing() {
    PAGE.with(|cell| {
        if let Some(page) = cell.borrow_mut().as_mut() {
            page.dispatch(Event::Reset);
        }
    });
}

/// "idle", "completed", "letters 2/5 rank 1" or "countdown 3".
#[wasm_bindgen]
pub fn forcing_status() -> String {
    PAGE.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|page| page.state().describe())
            .unwrap_or_else(|| "idle".to_string())
    })
}
