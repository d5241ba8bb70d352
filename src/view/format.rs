//! Text formatting for prices, property cards and offer entries

use crate::models::types::{Offer, Property};

/// en-US dollars, no fraction digits: `1250000.0` -> `$1,250,000`
pub fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return "n/a".to_string();
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "3 bd · 2 ba · 1450 sqft"
pub fn property_facts(property: &Property) -> String {
    format!(
        "{} bd · {} ba · {} sqft",
        property.bedrooms, property.bathrooms, property.area_sqft
    )
}

pub fn render_property_card(property: &Property) -> String {
    let mut lines = vec![
        format!("▸ {}  {}", property.title, format_price(property.price)),
    ];
    if !property.description.is_empty() {
        lines.push(format!("  {}", property.description));
    }
    lines.push(format!("  {}", property_facts(property)));
    if let Some(image) = property.cover_image() {
        lines.push(format!("  🖼  {}", image));
    }
    lines.push(format!("  Submit Offer: orangebrick offer --property {}", property.id));
    lines.join("\n")
}

pub fn render_offer_entry(offer: &Offer) -> String {
    let mut lines = vec![
        format!("• {}  {}", offer.full_name, format_price(offer.amount)),
        format!("  For property {}", offer.property_id),
    ];
    if let Some(message) = offer.message.as_deref().filter(|m| !m.is_empty()) {
        lines.push(format!("  “{}”", message));
    }
    if let Some(created_at) = offer.created_at {
        lines.push(format!("  {}", created_at.format("%b %e, %Y %H:%M UTC")));
    }
    lines.join("\n")
}
