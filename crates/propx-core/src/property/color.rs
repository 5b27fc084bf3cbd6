//! Color literals
//!
//! A color is a CSS named color (case-insensitive), a `#rgb`, `#rgba`,
//! `#rrggbb` or `#rrggbbaa` hex string, an `(r, g, b)` tuple of bytes, or an
//! `(r, g, b, a)` tuple whose alpha lies in `0..=1`.

use crate::value::Value;
use regex::Regex;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid hex color regex")
});

/// CSS named colors, sorted for binary search
pub const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

/// Whether `name` is a CSS named color
pub fn is_named_color(name: &str) -> bool {
    NAMED_COLORS
        .binary_search(&name.to_ascii_lowercase().as_str())
        .is_ok()
}

/// Whether `s` is a `#`-prefixed hex color of 3, 4, 6 or 8 digits
pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR.is_match(s)
}

/// Whether `value` is any accepted color form
pub fn is_color(value: &Value) -> bool {
    match value {
        Value::String(s) => is_hex_color(s) || is_named_color(s),
        Value::List(items) => match items.as_slice() {
            [r, g, b] => [r, g, b].iter().all(|c| is_byte(c)),
            [r, g, b, a] => {
                [r, g, b].iter().all(|c| is_byte(c))
                    && a.as_f64().is_some_and(|a| (0.0..=1.0).contains(&a))
            }
            _ => false,
        },
        _ => false,
    }
}

fn is_byte(value: &Value) -> bool {
    value.as_i64().is_some_and(|c| (0..=255).contains(&c))
}
