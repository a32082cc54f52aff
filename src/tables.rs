use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    api::zappi::Status,
    core::estimator::{ChargeRequest, Estimate},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_estimate_table(request: &ChargeRequest, estimate: &Estimate) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Current", "Target", "Capacity", "Price", "To add", "Energy", "Cost"]);
    let inputs = [
        Cell::new(request.current).set_alignment(CellAlignment::Right),
        Cell::new(request.target).set_alignment(CellAlignment::Right),
        Cell::new(request.capacity).set_alignment(CellAlignment::Right),
        Cell::new(request.price).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
    ];
    let outputs = match estimate {
        Estimate::AlreadyCharged => [
            Cell::new("already charged").fg(Color::Green),
            Cell::new("–").add_attribute(Attribute::Dim),
            Cell::new("–").add_attribute(Attribute::Dim),
        ],
        Estimate::Required(requirement) => [
            Cell::new(requirement.percent_to_add).set_alignment(CellAlignment::Right),
            Cell::new(requirement.kwh_needed_rounded).set_alignment(CellAlignment::Right),
            Cell::new(requirement.estimated_cost_rounded)
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkYellow),
        ],
    };
    table.add_row(inputs.into_iter().chain(outputs));
    table
}

pub fn build_status_table(status: &Status) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Mode", "Status", "Added"]);
    table.add_row(vec![
        Cell::new(status.mode_name()).fg(if status.is_charging() {
            Color::Green
        } else {
            Color::Reset
        }),
        Cell::new(status.status_name()).fg(match status.status {
            3 => Color::Green,
            5 => Color::Blue,
            _ => Color::DarkYellow,
        }),
        Cell::new(format!("{:.2}", status.charge_added)).set_alignment(CellAlignment::Right),
    ]);
    table
}
