//! Cosmetic palette names built from ice-cream flavour archetypes

use super::Rgb;
use std::collections::HashMap;

struct Flavor {
    name: &'static str,
    hue: (f64, f64),
    saturation: (f64, f64),
    lightness: (f64, f64),
}

const fn flavor(
    name: &'static str,
    hue: (f64, f64),
    saturation: (f64, f64),
    lightness: (f64, f64),
) -> Flavor {
    Flavor {
        name,
        hue,
        saturation,
        lightness,
    }
}

const FLAVORS: [Flavor; 10] = [
    flavor("Vanilla", (40.0, 60.0), (0.0, 0.15), (0.85, 1.0)),
    flavor("Chocolate", (20.0, 40.0), (0.3, 0.6), (0.2, 0.4)),
    flavor("Strawberry", (350.0, 360.0), (0.3, 0.7), (0.7, 0.9)),
    flavor("Mint", (150.0, 170.0), (0.2, 0.4), (0.7, 0.9)),
    flavor("Blueberry", (220.0, 240.0), (0.3, 0.6), (0.4, 0.6)),
    flavor("Caramel", (25.0, 45.0), (0.4, 0.7), (0.4, 0.6)),
    flavor("Pistachio", (90.0, 120.0), (0.2, 0.4), (0.6, 0.8)),
    flavor("Grape", (270.0, 290.0), (0.3, 0.6), (0.3, 0.5)),
    flavor("Coffee", (25.0, 40.0), (0.4, 0.7), (0.2, 0.4)),
    flavor("Cotton Candy", (300.0, 320.0), (0.2, 0.4), (0.8, 0.9)),
];

const HUE_WEIGHT: f64 = 0.5;
const SATURATION_WEIGHT: f64 = 0.25;
const LIGHTNESS_WEIGHT: f64 = 0.25;

fn bound_distance(value: f64, (lo, hi): (f64, f64)) -> f64 {
    (value - lo).abs().min((value - hi).abs())
}

/// Name of the archetype closest to `hex`; unparseable input maps to the first entry.
pub fn closest_flavor(hex: &str) -> &'static str {
    let Some(rgb) = Rgb::from_hex(hex) else {
        return FLAVORS[0].name;
    };
    let hsl = rgb.to_hsl();
    let hue = if hsl.h < 0.0 { hsl.h + 360.0 } else { hsl.h };

    let mut best = &FLAVORS[0];
    let mut smallest = f64::MAX;
    for f in &FLAVORS {
        let diff = bound_distance(hue, f.hue) * HUE_WEIGHT
            + bound_distance(hsl.s, f.saturation) * SATURATION_WEIGHT
            + bound_distance(hsl.l, f.lightness) * LIGHTNESS_WEIGHT;
        if diff < smallest {
            smallest = diff;
            best = f;
        }
    }
    best.name
}

/// "<Top> Swirl" for a single dominant flavour, "<Top> <Second>" otherwise.
pub fn generate_palette_name<S: AsRef<str>>(colors: &[S]) -> String {
    if colors.is_empty() {
        return "Untitled".to_string();
    }

    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for c in colors {
        *counts.entry(closest_flavor(c.as_ref())).or_default() += 1;
    }

    let mut ranked: Vec<(&'static str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.cmp(b)));

    match ranked.as_slice() {
        [(only, _)] => format!("{only} Swirl"),
        [(first, _), (second, _), ..] => format!("{first} {second}"),
        [] => "Untitled".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vanilla_swirl() {
        let colors = ["#F0F0E0", "#FFFFF0", "#EEEEDD", "#E8E8D0", "#F5F5E5"];
        assert_eq!(generate_palette_name(&colors), "Vanilla Swirl");
    }

    #[test]
    fn test_two_flavours_ranked_by_count() {
        assert_eq!(closest_flavor("#4060C0"), "Blueberry");
        let colors = ["#F0F0E0", "#4060C0", "#FFFFF0"];
        assert_eq!(generate_palette_name(&colors), "Vanilla Blueberry");
    }

    #[test]
    fn test_ties_break_alphabetically() {
        let colors = ["#F0F0E0", "#4060C0"];
        assert_eq!(generate_palette_name(&colors), "Blueberry Vanilla");
    }

    #[test]
    fn test_empty_palette_name() {
        let colors: [&str; 0] = [];
        assert_eq!(generate_palette_name(&colors), "Untitled");
    }
}
