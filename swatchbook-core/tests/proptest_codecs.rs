//! Property-based tests for colors, gradients and codec round trips
//!
//! Decoders must never panic on arbitrary input, and encoders must produce
//! bytes their own decoder reads back to the same palette.

use proptest::prelude::*;
use swatchbook::coder::{AcoCoder, AseCoder, ClrCoder, Format, GimpCoder, JsonCoder, PaletteCoder};
use swatchbook::{Color, ColorType, Gradient, Group, Palette};

fn unit() -> impl Strategy<Value = f32> {
    0.0f32..=1.0
}

fn name_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9 äöü✓-]{0,24}")
}

fn color_type_strategy() -> impl Strategy<Value = ColorType> {
    prop_oneof![
        Just(ColorType::Normal),
        Just(ColorType::Spot),
        Just(ColorType::Global),
    ]
}

fn color_strategy() -> impl Strategy<Value = Color> {
    let color = prop_oneof![
        (unit(), unit(), unit()).prop_map(|(r, g, b)| Color::rgb(r, g, b)),
        (unit(), unit(), unit(), unit()).prop_map(|(c, m, y, k)| Color::cmyk(c, m, y, k)),
        unit().prop_map(Color::gray),
        (0.0f32..=100.0, -128.0f32..=128.0, -128.0f32..=128.0)
            .prop_map(|(l, a, b)| Color::lab(l, a, b)),
    ];
    (color, name_strategy(), color_type_strategy()).prop_map(|(color, name, color_type)| {
        let mut color = color.expect("generated components are in range");
        color.set_name(name);
        color.set_color_type(color_type);
        color
    })
}

fn palette_strategy() -> impl Strategy<Value = Palette> {
    (
        prop::collection::vec(color_strategy(), 0..12),
        prop::collection::vec(
            ("[a-zA-Z ]{0,12}", prop::collection::vec(color_strategy(), 0..6)),
            0..4,
        ),
    )
        .prop_map(|(colors, groups)| {
            let mut palette = Palette::new();
            for color in colors {
                palette.push_color(color);
            }
            for (name, colors) in groups {
                palette.push_group(Group::new(name, colors));
            }
            palette
        })
}

proptest! {
    #[test]
    fn test_hex_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>()) {
        let hex = format!("#{r:02x}{g:02x}{b:02x}{a:02x}");
        let color = Color::from_hex(&hex, true).unwrap();
        prop_assert_eq!(color.hex_rgba(), hex.clone());
        prop_assert_eq!(color.hex_rgb(), hex[..7].to_string());

        let upper = Color::from_hex(&hex.to_uppercase(), true).unwrap();
        prop_assert_eq!(upper, color);
    }

    #[test]
    fn test_hex_rejects_wrong_lengths(digits in "[0-9a-f]{0,10}") {
        prop_assume!(digits.len() != 6 && digits.len() != 8);
        prop_assert!(Color::from_hex(&digits, true).is_err());
    }

    #[test]
    fn test_normalized_positions_span_unit_interval(
        positions in prop::collection::vec(-1000.0f64..1000.0, 2..16)
    ) {
        let min = positions.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = positions.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(max - min > 1e-6);

        let colors = vec![Color::gray(0.5).unwrap(); positions.len()];
        let gradient = Gradient::from_colors_with_positions(colors, &positions).unwrap();
        let normalized = gradient.normalized().unwrap();

        prop_assert_eq!(normalized.stops.len(), positions.len());
        prop_assert_eq!(normalized.stops.first().map(|s| s.position), Some(0.0));
        prop_assert_eq!(normalized.stops.last().map(|s| s.position), Some(1.0));
        for pair in normalized.stops.windows(2) {
            prop_assert!(pair[0].position <= pair[1].position);
        }
    }

    #[test]
    fn test_ase_round_trip(palette in palette_strategy()) {
        let coder = AseCoder::new();
        let data = coder.data(&palette).unwrap();
        let decoded = coder.load(&data).unwrap();
        prop_assert_eq!(&decoded, &palette);
        prop_assert_eq!(coder.data(&decoded).unwrap(), data);
    }

    #[test]
    fn test_aco_encoding_is_stable(palette in palette_strategy()) {
        let coder = AcoCoder::new();
        let data = coder.data(&palette).unwrap();
        let decoded = coder.load(&data).unwrap();
        prop_assert_eq!(decoded.colors().len(), palette.total_color_count());
        prop_assert_eq!(coder.data(&decoded).unwrap(), data);
    }

    #[test]
    fn test_json_round_trip(palette in palette_strategy(), global in prop::collection::vec(color_strategy(), 0..3)) {
        let mut palette = palette;
        for color in global {
            palette.push_global_color(color);
        }
        let coder = JsonCoder::new();
        let decoded = coder.load(&coder.data(&palette).unwrap()).unwrap();
        prop_assert_eq!(decoded, palette);
    }

    #[test]
    fn test_gimp_round_trip(bytes in prop::collection::vec(any::<[u8; 3]>(), 0..20), named in any::<bool>()) {
        let mut palette = if named { Palette::named("generated") } else { Palette::new() };
        for (i, [r, g, b]) in bytes.into_iter().enumerate() {
            palette.push_color(Color::from_rgb_bytes(r, g, b).with_name(format!("color {i}")));
        }
        let coder = GimpCoder::new();
        let decoded = coder.load(&coder.data(&palette).unwrap()).unwrap();
        prop_assert_eq!(decoded, palette);
    }

    #[test]
    fn test_decoders_never_panic(data in prop::collection::vec(any::<u8>(), 0..256)) {
        for format in Format::ALL {
            let _ = format.coder().load(&data);
        }
        let _ = ClrCoder::new().load(&[b"bplist00".as_slice(), data.as_slice()].concat());
    }
}
