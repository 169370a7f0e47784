//! The control panel: markup, controls and the state behind them

use crate::ElementIds;
use filter_engine::FilterStats;
use live_tree::ElementSpec;
use profile_model::{FilterCriteria, ThresholdField};

const BORDER_COLOR: &str = "rgb(255, 136, 0)";
const BACKGROUND_COLOR: &str = "rgb(34, 34, 34)";
const FONT_COLOR: &str = "white";

/// Button actions on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelAction {
    Filter,
    Reset,
    ToggleFilters,
    Close,
}

/// User interaction with the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Raw text typed into a threshold input
    Input { field: ThresholdField, raw: String },
    Action(PanelAction),
}

/// What a panel control does when operated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Input(ThresholdField),
    Action(PanelAction),
}

/// An interactive element of the panel, by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelControl {
    pub id: String,
    pub kind: ControlKind,
}

/// Every interactive control, so a host can attach listeners by id
pub fn controls(ids: &ElementIds) -> Vec<PanelControl> {
    let control = |id: &str, kind| PanelControl {
        id: id.to_string(),
        kind,
    };
    vec![
        control(&ids.min_age, ControlKind::Input(ThresholdField::AgeMin)),
        control(&ids.max_age, ControlKind::Input(ThresholdField::AgeMax)),
        control(&ids.min_size, ControlKind::Input(ThresholdField::SizeMin)),
        control(&ids.max_size, ControlKind::Input(ThresholdField::SizeMax)),
        control(&ids.filter_button, ControlKind::Action(PanelAction::Filter)),
        control(&ids.reset_button, ControlKind::Action(PanelAction::Reset)),
        control(&ids.toggle, ControlKind::Action(PanelAction::ToggleFilters)),
        control(&ids.close, ControlKind::Action(PanelAction::Close)),
    ]
}

/// Values typed into the panel and the latest pass result.
///
/// Lives exactly as long as one overlay instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    inputs: FilterCriteria,
    stats: FilterStats,
    filters_collapsed: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record raw input text. Empty or non-numeric text clears the slot.
    pub fn set_input(&mut self, field: ThresholdField, raw: &str) {
        self.inputs.set(field, parse_input(raw));
    }

    /// Criteria built from the current inputs
    pub fn criteria(&self) -> FilterCriteria {
        self.inputs
    }

    pub fn clear_inputs(&mut self) {
        self.inputs = FilterCriteria::none();
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    pub fn set_stats(&mut self, stats: FilterStats) {
        self.stats = stats;
    }

    pub fn filters_collapsed(&self) -> bool {
        self.filters_collapsed
    }

    /// Flip the collapsed flag and return the new value
    pub fn toggle_filters(&mut self) -> bool {
        self.filters_collapsed = !self.filters_collapsed;
        self.filters_collapsed
    }
}

fn parse_input(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Label of the collapse toggle for a collapsed state
pub fn toggle_label(collapsed: bool) -> &'static str {
    if collapsed {
        "[Show Filters]"
    } else {
        "[Minimize Filters]"
    }
}

struct InputDescriptor {
    field: ThresholdField,
    placeholder: &'static str,
    title: Option<&'static str>,
    min: &'static str,
    max: &'static str,
}

const AGE_INPUTS: [InputDescriptor; 2] = [
    InputDescriptor {
        field: ThresholdField::AgeMin,
        placeholder: "Min Age e.g. 19",
        title: Some("The minimum age someone can be before being filtered out. Note: will also filter out anyone who does not have an age listed."),
        min: "18",
        max: "120",
    },
    InputDescriptor {
        field: ThresholdField::AgeMax,
        placeholder: "Max Age e.g. 99",
        title: Some("The maximum age someone can be before being filtered out. Note: will also filter out anyone who does not have an age listed."),
        min: "18",
        max: "120",
    },
];

const SIZE_INPUTS: [InputDescriptor; 2] = [
    InputDescriptor {
        field: ThresholdField::SizeMin,
        placeholder: "Min Size e.g. 5",
        title: None,
        min: "0",
        max: "20",
    },
    InputDescriptor {
        field: ThresholdField::SizeMax,
        placeholder: "Max Size e.g. 5",
        title: None,
        min: "0",
        max: "20",
    },
];

fn input_id(ids: &ElementIds, field: ThresholdField) -> &str {
    match field {
        ThresholdField::AgeMin => &ids.min_age,
        ThresholdField::AgeMax => &ids.max_age,
        ThresholdField::SizeMin => &ids.min_size,
        ThresholdField::SizeMax => &ids.max_size,
    }
}

fn input(ids: &ElementIds, descriptor: &InputDescriptor) -> ElementSpec {
    let mut spec = ElementSpec::new("input")
        .with_id(input_id(ids, descriptor.field))
        .with_attribute("type", "number")
        .with_attribute("min", descriptor.min)
        .with_attribute("max", descriptor.max)
        .with_attribute("placeholder", descriptor.placeholder)
        .with_style("flex", "1");
    if let Some(title) = descriptor.title {
        spec = spec.with_title(title);
    }
    spec
}

fn fieldset(legend: &str, inputs: Vec<ElementSpec>) -> ElementSpec {
    ElementSpec::new("fieldset")
        .with_style("display", "flex")
        .with_style("flex-direction", "row")
        .with_style("gap", "2em")
        .with_style("border", format!("1px solid {BORDER_COLOR}"))
        .with_child(ElementSpec::new("legend").with_text(legend))
        .with_children(inputs)
}

fn button(id: &str, text: &str) -> ElementSpec {
    ElementSpec::new("button")
        .with_id(id)
        .with_text(text)
        .with_style("border-radius", "2px")
        .with_style("background-color", "grey")
        .with_style("transition-duration", "0.4s")
}

/// Markup of the whole panel
pub fn panel_spec(ids: &ElementIds) -> ElementSpec {
    let header = ElementSpec::new("div")
        .with_id(&ids.header)
        .with_style("text-align", "center")
        .with_style("font-weight", "bolder")
        .with_style("border-bottom", format!("1px solid {BORDER_COLOR}"))
        .with_child(ElementSpec::new("h2").with_text("Sniff Tools"))
        .with_child(
            ElementSpec::new("small")
                .with_id(&ids.toggle)
                .with_text(toggle_label(false))
                .with_style("cursor", "pointer"),
        )
        .with_child(
            ElementSpec::new("button")
                .with_id(&ids.close)
                .with_text("X")
                .with_title("Close Filters (will restore all profiles)")
                .with_style("position", "absolute")
                .with_style("background", "transparent")
                .with_style("top", "2px")
                .with_style("right", "2px"),
        );

    let stats = ElementSpec::new("div")
        .with_id(&ids.stats)
        .with_title("Profiles shown or hidden by the latest filter pass.")
        .with_style("width", "100%")
        .with_style("text-align", "center");

    let filters = ElementSpec::new("div")
        .with_id(&ids.filter_wrapper)
        .with_style("width", "100%")
        .with_style("text-align", "center")
        .with_child(fieldset(
            "Age Filters",
            AGE_INPUTS.iter().map(|d| input(ids, d)).collect(),
        ))
        .with_child(fieldset(
            "Size Filters",
            SIZE_INPUTS.iter().map(|d| input(ids, d)).collect(),
        ))
        .with_child(ElementSpec::new("hr"))
        .with_child(button(&ids.filter_button, "Filter Profiles"))
        .with_child(button(&ids.reset_button, "Reset Filters"));

    ElementSpec::new("div")
        .with_id(&ids.panel)
        .with_style("background-color", BACKGROUND_COLOR)
        .with_style("color", FONT_COLOR)
        .with_style("border", format!("3px solid {BORDER_COLOR}"))
        .with_style("position", "absolute")
        .with_style("z-index", "99")
        .with_style("width", "30vw")
        .with_style("max-width", "600px")
        .with_style("min-width", "290px")
        .with_style("overflow", "hidden")
        .with_child(header)
        .with_child(stats)
        .with_child(filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_parse_to_criteria() {
        let mut ui = UiState::new();
        ui.set_input(ThresholdField::AgeMax, " 40 ");
        ui.set_input(ThresholdField::SizeMin, "abc");
        ui.set_input(ThresholdField::AgeMin, "");

        let criteria = ui.criteria();
        assert_eq!(criteria.age_max, Some(40.0));
        assert_eq!(criteria.size_min, None);
        assert_eq!(criteria.age_min, None);

        ui.clear_inputs();
        assert!(ui.criteria().is_empty());
    }

    #[test]
    fn test_toggle_filters() {
        let mut ui = UiState::new();
        assert!(!ui.filters_collapsed());
        assert!(ui.toggle_filters());
        assert_eq!(toggle_label(ui.filters_collapsed()), "[Show Filters]");
        assert!(!ui.toggle_filters());
    }

    #[test]
    fn test_every_control_is_in_the_panel() {
        let ids = ElementIds::new("t_");
        let spec = panel_spec(&ids);

        fn collect(spec: &ElementSpec, out: &mut Vec<String>) {
            out.extend(spec.id.clone());
            for child in &spec.children {
                collect(child, out);
            }
        }
        let mut found = Vec::new();
        collect(&spec, &mut found);

        for control in controls(&ids) {
            assert!(found.contains(&control.id), "missing {}", control.id);
        }
        assert!(found.contains(&ids.stats));
        assert!(!found.contains(&ids.guard));
    }
}
