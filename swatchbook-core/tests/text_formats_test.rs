//! Text palette formats and gradients built from them

use pretty_assertions::assert_eq;
use swatchbook::coder::{GimpCoder, HexTextCoder, JascCoder, JsonCoder, PaletteCoder, ParseOptions};
use swatchbook::{Color, ColorType, Gradient, Group, Palette, PaletteError};

const MONA: &str = "GIMP Palette
Name: mona
Columns: 6
#
 30  27  25\tUmber shadow
 76  62  45\tBurnt sienna
128 108  70\tOchre
163 144  98\tSfumato
198 184 139\tVeil
230 221 186\tHighlight
";

#[test]
fn gimp_palette_becomes_an_even_gradient() {
    let palette = GimpCoder::new().load(MONA.as_bytes()).unwrap();
    assert_eq!(palette.name(), Some("mona"));
    assert_eq!(palette.colors().len(), 6);

    let gradient = Gradient::from_palette(&palette);
    assert_eq!(gradient.name.as_deref(), Some("mona"));
    let positions: Vec<f64> = gradient.stops.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    assert_eq!(gradient.stops[0].color.hex_rgb(), "#1e1b19");
    assert_eq!(gradient.stops[5].color.name(), Some("Highlight"));
}

#[test]
fn gimp_round_trip_is_byte_exact_for_canonical_files() {
    let canonical = "GIMP Palette
Name: mona
#
 30  27  25\tUmber shadow
128 108  70
";
    let coder = GimpCoder::new();
    let palette = coder.load(canonical.as_bytes()).unwrap();
    assert_eq!(coder.data(&palette).unwrap(), canonical.as_bytes());
}

#[test]
fn gradient_back_to_palette_and_json() {
    let palette = GimpCoder::new().load(MONA.as_bytes()).unwrap();
    let gradient = Gradient::from_palette(&palette).reversed().unwrap();
    assert_eq!(gradient.stops[0].color.name(), Some("Highlight"));
    assert_eq!(gradient.stops[0].position, 0.0);

    let json = gradient.to_json().unwrap();
    let restored = Gradient::from_json(&json).unwrap();
    assert_eq!(restored, gradient);

    let back = restored.to_palette();
    assert_eq!(back.name(), Some("mona"));
    assert_eq!(back.colors()[0].name(), Some("Highlight"));
    assert_eq!(back.colors().len(), 6);
}

#[test]
fn jasc_and_gimp_agree_on_colors() {
    let palette = GimpCoder::new().load(MONA.as_bytes()).unwrap();
    let jasc = JascCoder::new();
    let converted = jasc.load(&jasc.data(&palette).unwrap()).unwrap();

    let before: Vec<[u8; 3]> = palette.colors().iter().map(Color::rgb_bytes).collect();
    let after: Vec<[u8; 3]> = converted.colors().iter().map(Color::rgb_bytes).collect();
    assert_eq!(before, after);
    assert!(converted.colors().iter().all(|c| c.name().is_none()));
}

#[test]
fn hex_text_keeps_alpha_and_names() {
    let mut palette = Palette::named("overlay");
    palette.push_color(Color::from_hex("#1e1b19", false).unwrap().with_name("shadow"));
    palette.push_color(
        Color::from_hex("e6ddba", false)
            .unwrap()
            .with_alpha(0.2)
            .unwrap(),
    );

    let coder = HexTextCoder::new();
    let text = String::from_utf8(coder.data(&palette).unwrap()).unwrap();
    assert_eq!(text, "; Name: overlay\n#1e1b19 shadow\n#e6ddba33\n");

    let decoded = coder.load(text.as_bytes()).unwrap();
    assert_eq!(decoded.colors()[1].hex_rgba(), "#e6ddba33");
    assert_eq!(decoded.colors()[0].name(), Some("shadow"));
}

#[test]
fn text_formats_reject_non_rgb_and_global_colors() {
    let mut lab = Palette::new();
    lab.push_color(Color::lab(60.0, 20.0, -30.0).unwrap());
    let mut global = Palette::new();
    global.push_global_color(Color::from_rgb_bytes(1, 2, 3));

    let coders: [&dyn PaletteCoder; 3] = [&GimpCoder::new(), &JascCoder::new(), &HexTextCoder::new()];
    for coder in coders {
        assert!(matches!(
            coder.data(&lab),
            Err(PaletteError::UnsupportedColorSpace(_))
        ));
        assert!(matches!(
            coder.data(&global),
            Err(PaletteError::UnsupportedStructure(_))
        ));
    }
}

#[test]
fn lenient_parsing_skips_what_strict_rejects() {
    let gpl = b"GIMP Palette\n1 2 3\nbroken line\n4 5 6\n";
    assert!(matches!(
        GimpCoder::new().load(gpl),
        Err(PaletteError::MalformedLine { line: 3, .. })
    ));
    let lenient = GimpCoder::with_options(ParseOptions::lenient()).load(gpl).unwrap();
    assert_eq!(lenient.colors().len(), 2);
}

#[test]
fn json_preserves_the_whole_model() {
    let mut palette = Palette::named("everything");
    palette.push_color(
        Color::rgba(0.25, 0.5, 0.75, 0.4)
            .unwrap()
            .with_name("glass")
            .with_color_type(ColorType::Spot),
    );
    palette.push_group(Group::new("empty", Vec::new()));
    palette.push_global_color(Color::gray(0.1).unwrap().with_color_type(ColorType::Global));

    let coder = JsonCoder::new();
    let decoded = coder.load(&coder.data(&palette).unwrap()).unwrap();
    assert_eq!(decoded, palette);
}
