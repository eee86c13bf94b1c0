//! Round trips of the binary swatch formats against hand-built fixtures

use pretty_assertions::assert_eq;
use swatchbook::binary::ByteWriter;
use swatchbook::coder::{AcoCoder, AseCoder, ClrCoder, PaletteCoder, ParseOptions};
use swatchbook::{Color, ColorSpace, ColorType, Group, Palette, PaletteError};

fn utf16_name(writer: &mut ByteWriter, name: &str, wide_length: bool) {
    let units = name.encode_utf16().count() as u32 + 1;
    if wide_length {
        writer.write_u32(units);
    } else {
        writer.write_u16(units as u16);
    }
    writer.write_utf16(name);
    writer.write_u16(0);
}

fn ase_color(writer: &mut ByteWriter, name: &str, model: &[u8; 4], values: &[f32], usage: u16) {
    let mut block = ByteWriter::new();
    utf16_name(&mut block, name, false);
    block.write_bytes(model);
    for value in values {
        block.write_f32(*value);
    }
    block.write_u16(usage);

    writer.write_u16(0x0001);
    writer.write_u32(block.len() as u32);
    writer.write_bytes(&block.into_inner());
}

/// A swatch file as a design tool would write it: loose colors, then two groups.
fn ase_fixture() -> Vec<u8> {
    let mut writer = ByteWriter::new();
    writer.write_bytes(b"ASEF");
    writer.write_u16(1);
    writer.write_u16(0);
    writer.write_u32(9);

    ase_color(&mut writer, "Paper", b"Gray", &[0.95], 2);
    ase_color(&mut writer, "Signal Red", b"RGB ", &[0.8901961, 0.0, 0.105882354], 0);

    for (group, colors) in [
        (
            "Print",
            vec![
                ("Process Cyan", *b"CMYK", vec![1.0f32, 0.0, 0.0, 0.0], 1u16),
                ("Leaf", *b"LAB ", vec![62.5f32, -41.25, 48.0], 2),
            ],
        ),
        (
            "Grüne Töne",
            vec![("Moos", *b"RGB ", vec![0.2f32, 0.4, 0.1], 2)],
        ),
    ] {
        let mut block = ByteWriter::new();
        utf16_name(&mut block, group, false);
        writer.write_u16(0xC001);
        writer.write_u32(block.len() as u32);
        writer.write_bytes(&block.into_inner());

        for (name, model, values, usage) in colors {
            ase_color(&mut writer, name, &model, &values, usage);
        }

        writer.write_u16(0xC002);
        writer.write_u32(0);
    }
    writer.into_inner()
}

#[test]
fn ase_fixture_decodes_structure() {
    let palette = AseCoder::new().load(&ase_fixture()).unwrap();

    assert_eq!(palette.colors().len(), 2);
    assert_eq!(palette.groups().len(), 2);
    assert_eq!(palette.total_color_count(), 5);

    let red = &palette.colors()[1];
    assert_eq!(red.name(), Some("Signal Red"));
    assert_eq!(red.color_type(), ColorType::Global);
    assert_eq!(red.hex_rgb(), "#e3001b");

    let print = &palette.groups()[0];
    assert_eq!(print.name(), Some("Print"));
    assert_eq!(print.colors()[0].space(), ColorSpace::Cmyk);
    assert_eq!(print.colors()[0].color_type(), ColorType::Spot);
    assert_eq!(print.colors()[1].components(), &[62.5, -41.25, 48.0]);
    assert_eq!(palette.groups()[1].name(), Some("Grüne Töne"));
}

#[test]
fn ase_fixture_round_trips_byte_exact() {
    let coder = AseCoder::new();
    let fixture = ase_fixture();
    let palette = coder.load(&fixture).unwrap();
    let encoded = coder.data(&palette).unwrap();

    assert_eq!(encoded, fixture);
    assert_eq!(coder.load(&encoded).unwrap(), palette);
}

#[test]
fn ase_truncated_anywhere_is_an_error() {
    let fixture = ase_fixture();
    let coder = AseCoder::new();
    for len in [0, 3, 11, 12, 20, fixture.len() - 1] {
        assert!(coder.load(&fixture[..len]).is_err(), "prefix of {len} bytes");
    }
}

fn aco_record(writer: &mut ByteWriter, space: u16, words: [u16; 4]) {
    writer.write_u16(space);
    for word in words {
        writer.write_u16(word);
    }
}

/// 256 named entries with a mix of color spaces, v1 and v2 sections.
fn aco_fixture() -> Vec<u8> {
    let records: Vec<(u16, [u16; 4], String)> = (0..256u32)
        .map(|i| {
            let name = match i {
                0 => "Red 500 - Primary".to_string(),
                255 => "ffffff".to_string(),
                _ => format!("Swatch {i}"),
            };
            let w = (i * 257) as u16;
            let record = match i {
                0 => (0, [0xF4F4, 0x4343, 0x3636, 0]),
                255 => (0, [0xFFFF, 0xFFFF, 0xFFFF, 0]),
                _ if i % 4 == 1 => (2, [w, 0xFFFF - w, 0x8000, 0x1234]),
                _ if i % 4 == 2 => (8, [(i * 39) as u16, 0, 0, 0]),
                _ if i % 4 == 3 => (7, [(i * 39) as u16, (-(i as i16) * 50) as u16, (i as i16 * 50) as u16, 0]),
                _ => (0, [w, w / 2, 0xFFFF - w, 0]),
            };
            (record.0, record.1, name)
        })
        .collect();

    let mut writer = ByteWriter::new();
    writer.write_u16(1);
    writer.write_u16(records.len() as u16);
    for (space, words, _) in &records {
        aco_record(&mut writer, *space, *words);
    }
    writer.write_u16(2);
    writer.write_u16(records.len() as u16);
    for (space, words, name) in &records {
        aco_record(&mut writer, *space, *words);
        utf16_name(&mut writer, name, true);
    }
    writer.into_inner()
}

#[test]
fn aco_fixture_decodes_names_and_spaces() {
    let palette = AcoCoder::new().load(&aco_fixture()).unwrap();
    let colors = palette.colors();

    assert_eq!(colors.len(), 256);
    assert_eq!(colors[0].name(), Some("Red 500 - Primary"));
    assert_eq!(colors[0].hex_rgb(), "#f44336");
    assert_eq!(colors[255].name(), Some("ffffff"));
    assert_eq!(colors[255].hex_rgb(), "#ffffff");

    assert_eq!(colors[1].space(), ColorSpace::Cmyk);
    assert_eq!(colors[2].space(), ColorSpace::Gray);
    assert_eq!(colors[3].space(), ColorSpace::Lab);
    assert_eq!(colors[4].space(), ColorSpace::Rgb);
    assert!(palette.groups().is_empty());
}

#[test]
fn aco_fixture_round_trips_byte_exact() {
    let coder = AcoCoder::new();
    let fixture = aco_fixture();
    let palette = coder.load(&fixture).unwrap();
    assert_eq!(coder.data(&palette).unwrap(), fixture);
}

#[test]
fn aco_trailing_bytes_follow_options() {
    let mut data = aco_fixture();
    data.extend_from_slice(&[0, 0]);

    assert!(matches!(
        AcoCoder::new().load(&data),
        Err(PaletteError::UnrecognizedFormat(_))
    ));
    let palette = AcoCoder::with_options(ParseOptions::lenient())
        .load(&data)
        .unwrap();
    assert_eq!(palette.colors().len(), 256);
}

#[test]
fn aco_count_limit_is_checked_before_reading() {
    let options = ParseOptions {
        max_entries: 16,
        ..ParseOptions::strict()
    };
    assert!(matches!(
        AcoCoder::with_options(options).load(&aco_fixture()),
        Err(PaletteError::UnsupportedStructure(_))
    ));
}

#[test]
fn clr_round_trip_is_semantic() {
    let mut palette = Palette::named("Apple II");
    for (name, hex) in [
        ("Black", "#000000"),
        ("Magenta", "#dd0033"),
        ("Dark Blue", "#000099"),
        ("Purple", "#dd22dd"),
    ] {
        palette.push_color(Color::from_hex(hex, false).unwrap().with_name(name));
    }
    palette.push_group(Group::new(
        "extras",
        vec![Color::gray(0.5).unwrap(), Color::cmyk(0.0, 1.0, 1.0, 0.0).unwrap()],
    ));

    let coder = ClrCoder::new();
    let decoded = coder.load(&coder.data(&palette).unwrap()).unwrap();

    assert_eq!(decoded.name(), Some("Apple II"));
    let expected: Vec<Color> = palette.all_colors().cloned().collect();
    assert_eq!(decoded.colors(), expected.as_slice());
}

#[test]
fn formats_convert_between_each_other() {
    let ase = AseCoder::new();
    let aco = AcoCoder::new();
    let palette = ase.load(&ase_fixture()).unwrap();

    let via_aco = aco.load(&aco.data(&palette).unwrap()).unwrap();
    let names: Vec<_> = via_aco.colors().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        vec![
            Some("Paper"),
            Some("Signal Red"),
            Some("Process Cyan"),
            Some("Leaf"),
            Some("Moos")
        ]
    );
    for (before, after) in palette.all_colors().zip(via_aco.colors()) {
        assert_eq!(before.hex_rgb(), after.hex_rgb());
    }
}
