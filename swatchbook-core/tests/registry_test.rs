//! Coder registry lookups and loading palettes from disk

use std::fs;
use swatchbook::coder::{self, Format, PaletteCoder};
use swatchbook::{Color, Group, Palette, PaletteError};
use tempfile::TempDir;

fn sample_palette() -> Palette {
    let mut palette = Palette::new();
    palette.push_color(Color::from_rgb_bytes(200, 40, 40).with_name("Brick"));
    palette.push_group(Group::new(
        "Sea",
        vec![
            Color::from_rgb_bytes(10, 80, 160).with_name("Deep"),
            Color::from_rgb_bytes(90, 170, 220).with_name("Shallow"),
        ],
    ));
    palette
}

#[test]
fn identifiers_resolve_to_their_formats() {
    let expected = [
        ("ase", Format::Ase),
        ("aco", Format::Aco),
        ("clr", Format::Clr),
        ("gpl", Format::Gimp),
        ("pal", Format::Jasc),
        ("psppalette", Format::Jasc),
        ("hex", Format::HexText),
        ("rgb", Format::HexText),
        ("rgba", Format::HexText),
        ("json", Format::Json),
        ("jsoncolorpalette", Format::Json),
    ];
    for (id, format) in expected {
        assert_eq!(coder::coder_for(id).unwrap().format(), format, "{id}");
        assert_eq!(
            coder::coder_for(&id.to_uppercase()).unwrap().format(),
            format
        );
    }
    assert_eq!(coder::supported_formats().len(), expected.len());
}

#[test]
fn unknown_identifiers_fail() {
    for id in ["", "pdf", "a se"] {
        assert!(matches!(
            coder::coder_for(id),
            Err(PaletteError::UnknownFormat(_))
        ));
    }
}

#[test]
fn every_format_encodes_an_empty_palette() -> Result<(), Box<dyn std::error::Error>> {
    for format in Format::ALL {
        let coder = format.coder();
        let data = coder.data(&Palette::new())?;
        let decoded = coder.load(&data)?;
        assert!(decoded.is_empty(), "{format}");
    }
    Ok(())
}

#[test]
fn load_file_picks_coder_by_extension() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let palette = sample_palette();

    for format in Format::ALL {
        let path = temp_dir
            .path()
            .join(format!("sample.{}", format.extension()));
        fs::write(&path, format.coder().data(&palette)?)?;

        let loaded = coder::load_file(&path)?;
        let names: Vec<_> = loaded.all_colors().map(|c| c.name()).collect();
        if format == Format::Jasc {
            assert_eq!(names, vec![None, None, None]);
        } else {
            assert_eq!(names, vec![Some("Brick"), Some("Deep"), Some("Shallow")], "{format}");
        }
        assert_eq!(loaded.groups().len(), usize::from(format.supports_groups()), "{format}");
    }
    Ok(())
}

#[test]
fn missing_file_is_not_readable() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("gone.aco");

    match coder::load_file(&path) {
        Err(PaletteError::FileNotReadable { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected FileNotReadable, got {other:?}"),
    }
    Ok(())
}

#[test]
fn wrong_extension_surfaces_decode_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("actually-gimp.ase");
    fs::write(&path, b"GIMP Palette\n1 2 3\n")?;

    assert!(matches!(
        coder::load_file(&path),
        Err(PaletteError::UnrecognizedFormat(_))
    ));
    Ok(())
}
