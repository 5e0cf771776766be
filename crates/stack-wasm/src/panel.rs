//! Debug panel: one folder per shape, one range slider per parameter.

use std::cell::RefCell;
use std::rc::Rc;

use stack_core::params::{ParamKey, ParamSpec, ParameterSet, PARAM_SPECS};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlInputElement};

use crate::listen;

const PANEL_STYLE: &str = "position:fixed;top:0;right:15px;width:245px;\
    font:11px/1.4 system-ui,sans-serif;color:#ebebeb;background:#1f1f1f;\
    padding:4px 0;max-height:100vh;overflow:auto;z-index:10";
const SUMMARY_STYLE: &str = "cursor:pointer;padding:4px 8px;font-weight:600";
const ROW_STYLE: &str = "display:flex;align-items:center;gap:6px;padding:2px 8px 6px 16px";

struct Slider {
    key: ParamKey,
    input: HtmlInputElement,
    readout: Element,
}

pub struct DebugPanel {
    root: Element,
    sliders: Vec<Slider>,
}

impl DebugPanel {
    /// Build the panel from the parameter table, append it to `<body>` and
    /// call `on_change` with the sanitized value whenever a slider moves.
    pub fn mount(
        document: &Document,
        values: &ParameterSet,
        on_change: impl FnMut(ParamKey, f32) + 'static,
    ) -> Result<Self, JsValue> {
        let body = document.body().ok_or("document has no body")?;
        let root = document.create_element("div")?;
        root.set_attribute("style", PANEL_STYLE)?;
        root.set_attribute("class", "stack-debug-panel")?;

        let on_change = Rc::new(RefCell::new(on_change));
        let mut sliders = Vec::with_capacity(PARAM_SPECS.len());

        for spec in PARAM_SPECS.iter() {
            let folder = document.create_element("details")?;
            folder.set_attribute("open", "")?;
            let summary = document.create_element("summary")?;
            summary.set_attribute("style", SUMMARY_STYLE)?;
            summary.set_text_content(Some(spec.folder));
            folder.append_child(&summary)?;

            let row = document.create_element("label")?;
            row.set_attribute("style", ROW_STYLE)?;
            let name = document.create_element("span")?;
            name.set_attribute("style", "flex:0 0 70px")?;
            name.set_text_content(Some(spec.label));

            let input = document
                .create_element("input")?
                .dyn_into::<HtmlInputElement>()
                .map_err(|_| JsValue::from_str("could not create slider input"))?;
            input.set_type("range");
            input.set_min(&spec.min.to_string());
            input.set_max(&spec.max.to_string());
            input.set_step(&spec.step.to_string());
            input.set_attribute("style", "flex:1 1 auto;min-width:0")?;

            let readout = document.create_element("span")?;
            readout.set_attribute("style", "flex:0 0 44px;text-align:right")?;

            let value = values.get(spec.key);
            input.set_value(&value.to_string());
            readout.set_text_content(Some(&format_value(spec, value)));

            row.append_child(&name)?;
            row.append_child(&input)?;
            row.append_child(&readout)?;
            folder.append_child(&row)?;
            root.append_child(&folder)?;

            let spec = *spec;
            let handler_input = input.clone();
            let handler_readout = readout.clone();
            let on_change = on_change.clone();
            listen(&input, "input", move |_: Event| {
                let value = spec.sanitize(handler_input.value_as_number() as f32);
                handler_readout.set_text_content(Some(&format_value(&spec, value)));
                (&mut *on_change.borrow_mut())(spec.key, value);
            })?;

            sliders.push(Slider {
                key: spec.key,
                input,
                readout,
            });
        }

        body.append_child(&root)?;
        Ok(Self { root, sliders })
    }

    /// Reflect a value set from outside the panel. Does not fire `input`.
    pub fn sync(&self, key: ParamKey, value: f32) {
        if let Some(slider) = self.sliders.iter().find(|s| s.key == key) {
            slider.input.set_value(&value.to_string());
            slider
                .readout
                .set_text_content(Some(&format_value(key.spec(), value)));
        }
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), JsValue> {
        if visible {
            self.root.remove_attribute("hidden")
        } else {
            self.root.set_attribute("hidden", "")
        }
    }
}

/// Show as many decimals as the slider step has.
fn format_value(spec: &ParamSpec, value: f32) -> String {
    let decimals = (-spec.step.log10()).round().max(0.0) as usize;
    format!("{:.*}", decimals, value)
}
