use serde::Serialize;

/// Chart palette, in assignment order.
pub const PALETTE: [&str; 8] = [
    "#8b5cf6", "#ec4899", "#6366f1", "#10b981", "#f59e0b", "#ef4444", "#06b6d4", "#84cc16",
];

pub fn color_for_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Category to color mapping for one aggregation pass, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorMap {
    entries: Vec<(String, &'static str)>,
}

impl ColorMap {
    pub fn get(&self, category: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, color)| *color)
    }

    /// Color for `category`, or the first palette entry when it was never seen.
    pub fn color_of(&self, category: &str) -> &'static str {
        self.get(category).unwrap_or(PALETTE[0])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries.iter().map(|(name, color)| (name.as_str(), *color))
    }
}

/// Assign palette colors by first-seen index. Repeated names keep their first color.
pub fn assign<S: AsRef<str>>(categories: &[S]) -> ColorMap {
    let mut entries: Vec<(String, &'static str)> = Vec::with_capacity(categories.len());

    for category in categories {
        let category = category.as_ref();
        if entries.iter().any(|(name, _)| name == category) {
            continue;
        }
        let color = color_for_index(entries.len());
        entries.push((category.to_string(), color));
    }

    ColorMap { entries }
}

/// Lighten (positive `percent`) or darken (negative) a `#rrggbb` color.
///
/// Each channel moves by `round(2.55 * percent)` and saturates at 0 and 255.
/// Input that is not a six-digit hex color is returned unchanged.
pub fn brightness_variant(color: &str, percent: f64) -> String {
    let Some(rgb) = parse_hex(color) else {
        return color.to_string();
    };

    let amount = (2.55 * percent).round() as i32;
    let shift = |channel: u32| (channel as i32 + amount).clamp(0, 255) as u32;

    let r = shift((rgb >> 16) & 0xff);
    let g = shift((rgb >> 8) & 0xff);
    let b = shift(rgb & 0xff);

    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn parse_hex(color: &str) -> Option<u32> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
