//! Write a sample document
//!
//! Draws a short tour of the writer: text, shapes, a clipped region, a
//! repeated footer and links.
//!
//! Usage:
//!   cargo run --release --bin pdf_scribe_demo -- out.pdf
//!   cargo run --release --bin pdf_scribe_demo -- out.pdf --encrypt --no-compress
//!   cargo run --release --bin pdf_scribe_demo -- out.pdf --font fonts/DejaVuSans.ttf

use std::path::PathBuf;
use std::process::ExitCode;

use pdf_scribe::encryption::{EncryptionSettings, Permissions};
use pdf_scribe::objects::catalog::ViewerPreference;
use pdf_scribe::objects::navigation::DestinationFit;
use pdf_scribe::writer::{BlendMode, Color, LineStyle, ObjectPlacement};
use pdf_scribe::{PdfConfig, PdfWriter, Result};

struct DemoConfig {
    output: PathBuf,
    encrypt: bool,
    compress: bool,
    font: Option<String>,
}

impl DemoConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut output = None;
        let mut encrypt = false;
        let mut compress = true;
        let mut font = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--encrypt" => encrypt = true,
                "--no-compress" => compress = false,
                "--font" => {
                    i += 1;
                    if i < args.len() {
                        font = Some(args[i].clone());
                    }
                },
                other if output.is_none() && !other.starts_with("--") => {
                    output = Some(PathBuf::from(other));
                },
                other => eprintln!("Ignoring argument {}", other),
            }
            i += 1;
        }

        Some(Self {
            output: output?,
            encrypt,
            compress,
            font,
        })
    }
}

fn build(config: &DemoConfig) -> Result<PdfWriter> {
    let mut writer = PdfWriter::with_config(
        PdfConfig::new()
            .with_compress(config.compress)
            .with_title("pdf_scribe demo")
            .with_creator("pdf_scribe_demo"),
    );
    writer.set_preference(ViewerPreference::DisplayDocTitle(true))?;

    // Footer drawn once and attached to every page
    let footer = writer.open_object();
    writer.set_stroke_color(Color::Gray(0.5))?;
    writer.line(40.0, 40.0, 555.0, 40.0)?;
    writer.select_font("Helvetica-Oblique", None, true, false)?;
    writer.add_text(40.0, 28.0, 8.0, "Generated by pdf_scribe", 0.0, 0.0, 0.0)?;
    writer.close_object()?;
    writer.add_object(footer, ObjectPlacement::All)?;

    let body_font = config.font.as_deref().unwrap_or("Helvetica");
    if writer.select_font(body_font, None, true, true)?.is_none() {
        writer.select_font("Helvetica", None, true, false)?;
    }
    writer.add_destination("top", DestinationFit::Fit)?;
    writer.add_text(72.0, 770.0, 24.0, "pdf_scribe", 0.0, 0.0, 0.0)?;
    writer.add_text(72.0, 745.0, 12.0, "Shapes, text and images in PDF 1.3", 0.0, 0.0, 0.0)?;

    writer.set_line_style(LineStyle::new(2.0))?;
    writer.set_color(Color::rgb(0.85, 0.9, 1.0))?;
    writer.set_stroke_color(Color::rgb(0.1, 0.2, 0.6))?;
    writer.filled_rectangle(72.0, 600.0, 200.0, 100.0)?;
    writer.rectangle(72.0, 600.0, 200.0, 100.0)?;
    writer.filled_ellipse(400.0, 650.0, 60.0, 40.0)?;

    writer.save()?;
    writer.clipping_rectangle_rounded(72.0, 400.0, 450.0, 150.0, 20.0, 20.0, 20.0, 20.0)?;
    writer.set_fill_transparency(BlendMode::Multiply, 0.5)?;
    for i in 0..10 {
        let shade = i as f32 / 10.0;
        writer.set_color(Color::rgb(shade, 0.4, 1.0 - shade))?;
        writer.filled_rectangle(72.0 + i as f32 * 45.0, 400.0, 45.0, 150.0)?;
    }
    writer.clipping_end()?;
    writer.restore()?;

    writer.set_color(Color::black())?;
    writer.add_text(300.0, 300.0, 14.0, "Rotated", 30.0, 0.0, 0.0)?;
    writer.add_link("https://example.com", 72.0, 250.0, 200.0, 265.0)?;
    writer.add_text(72.0, 253.0, 12.0, "example.com", 0.0, 0.0, 0.0)?;

    writer.new_page()?;
    writer.add_text(72.0, 770.0, 12.0, "Back to the first page", 0.0, 0.0, 0.0)?;
    writer.add_internal_link("top", 72.0, 765.0, 220.0, 782.0)?;

    if config.encrypt {
        writer.set_encryption(
            EncryptionSettings::new("", "owner").with_permissions(Permissions::PRINT | Permissions::COPY),
        )?;
    }
    Ok(writer)
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(config) = DemoConfig::from_args() else {
        eprintln!("Usage: pdf_scribe_demo <output.pdf> [--encrypt] [--no-compress] [--font <file.ttf>]");
        return ExitCode::FAILURE;
    };

    let result = build(&config).and_then(|writer| {
        writer.write_to_file(&config.output)?;
        Ok(writer)
    });
    match result {
        Ok(writer) => {
            for message in writer.messages() {
                eprintln!("warning: {}", message);
            }
            println!("Wrote {} ({} pages)", config.output.display(), writer.page_count());
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
