//! Browser rendering of a [`ParamPanel`]: one labelled range input per
//! controller, appended to a host element.

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::{Document, Element, Event, HtmlInputElement};

use super::ParamPanel;

/// Handles to the mounted inputs, kept to push value changes back to the page.
#[derive(Debug)]
pub struct DomPanel {
    inputs: Vec<HtmlInputElement>,
}

impl DomPanel {
    /// Build the panel under `host`. `on_input(index, value)` runs for every
    /// `input` event of controller `index`.
    pub fn mount<T: 'static>(
        document: &Document,
        host: &Element,
        panel: &ParamPanel<T>,
        target: &T,
        on_input: Rc<dyn Fn(usize, f32)>,
    ) -> Result<Self, JsValue> {
        let root = document.create_element("div")?;
        root.set_class_name("param-panel");
        let heading = document.create_element("strong")?;
        heading.set_text_content(Some(panel.title()));
        root.append_child(&heading)?;

        let mut inputs = Vec::with_capacity(panel.len());
        for (index, controller) in panel.controllers().iter().enumerate() {
            let label = document.create_element("label")?;
            label.set_text_content(Some(controller.name()));

            let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
            input.set_type("range");
            input.set_min(&controller.min().to_string());
            input.set_max(&controller.max().to_string());
            // The step only sizes keyboard nudges; dragging must not snap.
            input.set_step("any");
            input.set_value_as_number(controller.value(target) as f64);

            let on_input = on_input.clone();
            let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                if let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                {
                    on_input(index, input.value_as_number() as f32);
                }
            });
            input.add_event_listener_with_callback("input", listener.as_ref().unchecked_ref())?;
            // The listener lives as long as the page.
            listener.forget();

            label.append_child(&input)?;
            root.append_child(&label)?;
            inputs.push(input);
        }
        host.append_child(&root)?;
        Ok(Self { inputs })
    }

    /// Copy the current values into the inputs, e.g. after a keyboard change.
    pub fn sync<T: 'static>(&self, panel: &ParamPanel<T>, target: &T) {
        for (input, controller) in self.inputs.iter().zip(panel.controllers()) {
            input.set_value_as_number(controller.value(target) as f64);
        }
    }
}
