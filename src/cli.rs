//! CLI launch parameters (§6). The original distillation sources these from
//! a browser URL query string; there is no Rust analogue, so they are
//! re-expressed here as flags with equivalent semantics.

use std::path::PathBuf;

use clap::Parser;

use crate::scene::RunMode;

#[derive(Debug, Parser)]
#[command(name = "pathtrace-compiler", about = "Compile a scene descriptor and run the progressive render loop")]
pub struct Args {
    /// Output resolution as `<width>x<height>`.
    #[arg(long, default_value = "512x512", value_parser = parse_res)]
    pub res: (u32, u32),

    /// Upload/stop frame index (§6): unset means interactive (`frame=-1`,
    /// the render loop never halts on its own); set to save the
    /// tone-mapped frame once the scene's sample budget is reached. Does
    /// not itself set the sample count — that comes from the scene
    /// descriptor's `samples` field.
    #[arg(long)]
    pub frame: Option<u32>,

    /// Path to the scene descriptor JSON file.
    #[arg(long)]
    pub scene: PathBuf,

    /// Comma- or underscore-joined run-mode tags: `test`, `nee`, `alpha`.
    #[arg(long, default_value = "", value_parser = parse_mode)]
    pub mode: RunMode,

    /// Path to write the tone-mapped PNG once the sample budget is reached.
    #[arg(long, default_value = "out.png")]
    pub out: PathBuf,
}

fn parse_res(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s.split_once('x').ok_or_else(|| format!("expected <width>x<height>, got {s:?}"))?;
    let w: u32 = w.parse().map_err(|_| format!("invalid width in {s:?}"))?;
    let h: u32 = h.parse().map_err(|_| format!("invalid height in {s:?}"))?;
    Ok((w, h))
}

fn parse_mode(s: &str) -> Result<RunMode, String> {
    let mut mode = RunMode::default();
    for tag in s.split([',', '_']).filter(|t| !t.is_empty()) {
        match tag {
            "test" => mode.test = true,
            "nee" => mode.next_event_estimation = true,
            "alpha" => mode.alpha = true,
            other => return Err(format!("unknown mode tag {other:?}")),
        }
    }
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_res_as_width_by_height() {
        assert_eq!(parse_res("1024x768").unwrap(), (1024, 768));
        assert!(parse_res("1024").is_err());
    }

    #[test]
    fn parses_joined_mode_tags() {
        let mode = parse_mode("nee_alpha").unwrap();
        assert!(mode.next_event_estimation);
        assert!(mode.alpha);
        assert!(!mode.test);
    }

    #[test]
    fn empty_mode_string_is_all_false() {
        let mode = parse_mode("").unwrap();
        assert!(!mode.test && !mode.next_event_estimation && !mode.alpha);
    }

    #[test]
    fn unknown_mode_tag_is_rejected() {
        assert!(parse_mode("bogus").is_err());
    }
}
