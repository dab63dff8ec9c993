// src/cli/args.rs
// scene_setup CLI arguments and parsing helpers
// RELEVANT FILES: src/cli/mod.rs, src/config.rs, src/bin/scene_setup.rs

use std::path::PathBuf;

use crate::config::SceneConfig;

/// Argument error; the message names the offending flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct CliError {
    msg: String,
}

impl CliError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

pub const USAGE: &str = "usage: scene_setup [--config <file.json>] [--assets <dir>] \
[--lat <deg>] [--lon <deg>] [--alt <m>] [--heading <deg>] [--pitch <deg>] [--marker] \
[--exaggeration <x>] [--output <file.json>]";

/// Parsed `scene_setup` flags. Unset overrides keep the config value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneCliArgs {
    pub config: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
    pub heading: Option<f64>,
    pub pitch: Option<f64>,
    pub exaggeration: Option<f64>,
    pub marker: bool,
    pub help: bool,
}

impl SceneCliArgs {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut out = SceneCliArgs::default();
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--config" => {
                    out.config = Some(PathBuf::from(parse_string(args, i, flag)?));
                    i += 1;
                }
                "--assets" => {
                    out.assets = Some(PathBuf::from(parse_string(args, i, flag)?));
                    i += 1;
                }
                "--output" | "-o" => {
                    out.output = Some(PathBuf::from(parse_string(args, i, flag)?));
                    i += 1;
                }
                "--lat" => {
                    out.lat = Some(parse_f64(args, i, flag)?);
                    i += 1;
                }
                "--lon" => {
                    out.lon = Some(parse_f64(args, i, flag)?);
                    i += 1;
                }
                "--alt" => {
                    out.alt = Some(parse_f64(args, i, flag)?);
                    i += 1;
                }
                "--heading" => {
                    out.heading = Some(parse_f64(args, i, flag)?);
                    i += 1;
                }
                "--pitch" => {
                    out.pitch = Some(parse_f64(args, i, flag)?);
                    i += 1;
                }
                "--exaggeration" => {
                    out.exaggeration = Some(parse_f64(args, i, flag)?);
                    i += 1;
                }
                "--marker" => out.marker = true,
                "--help" | "-h" => out.help = true,
                other => {
                    return Err(CliError::new(format!("unknown argument '{other}'")));
                }
            }
            i += 1;
        }
        Ok(out)
    }

    /// Apply the pose and terrain overrides on top of `config`.
    pub fn apply(&self, config: &mut SceneConfig) {
        let cam = &mut config.camera;
        if let Some(v) = self.lat {
            cam.latitude = v;
        }
        if let Some(v) = self.lon {
            cam.longitude = v;
        }
        if let Some(v) = self.alt {
            cam.altitude = v;
        }
        if let Some(v) = self.heading {
            cam.heading = v;
        }
        if let Some(v) = self.pitch {
            cam.pitch = v;
        }
        if let Some(v) = self.exaggeration {
            config.terrain.exaggeration = v;
        }
        if self.marker {
            config.marker.enabled = true;
        }
    }
}

fn parse_string<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str, CliError> {
    args.get(idx + 1)
        .map(String::as_str)
        .ok_or_else(|| CliError::new(format!("missing value for {flag}")))
}

/// Parse a float argument value.
pub fn parse_f64(args: &[String], idx: usize, flag: &str) -> Result<f64, CliError> {
    let raw = parse_string(args, idx, flag)?;
    let value = raw
        .parse::<f64>()
        .map_err(|_| CliError::new(format!("invalid float value '{raw}' for {flag}")))?;
    if !value.is_finite() {
        return Err(CliError::new(format!("{flag} must be finite, got '{raw}'")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_pose_flags() {
        let cli = SceneCliArgs::parse(&args(&[
            "--lat", "46.5", "--lon", "7.9", "--alt", "3500", "--heading", "90", "--marker",
        ]))
        .unwrap();
        assert_eq!(cli.lat, Some(46.5));
        assert_eq!(cli.lon, Some(7.9));
        assert_eq!(cli.alt, Some(3500.0));
        assert_eq!(cli.heading, Some(90.0));
        assert!(cli.marker);
        assert!(cli.pitch.is_none());
    }

    #[test]
    fn empty_args_are_defaults() {
        assert_eq!(SceneCliArgs::parse(&[]).unwrap(), SceneCliArgs::default());
    }

    #[test]
    fn reject_missing_and_invalid_values() {
        let err = SceneCliArgs::parse(&args(&["--lat"])).unwrap_err();
        assert!(err.to_string().contains("missing value for --lat"));

        let err = SceneCliArgs::parse(&args(&["--alt", "high"])).unwrap_err();
        assert!(err.to_string().contains("invalid float value 'high'"));

        let err = SceneCliArgs::parse(&args(&["--pitch", "NaN"])).unwrap_err();
        assert!(err.to_string().contains("must be finite"));
    }

    #[test]
    fn reject_unknown_flag() {
        let err = SceneCliArgs::parse(&args(&["--zoom", "3"])).unwrap_err();
        assert!(err.to_string().contains("unknown argument '--zoom'"));
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = SceneCliArgs::parse(&args(&["--alt", "120", "--exaggeration", "2.5", "--marker"]))
            .unwrap();
        let mut config = SceneConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.camera.altitude, 120.0);
        assert_eq!(config.camera.latitude, 42.97330);
        assert_eq!(config.terrain.exaggeration, 2.5);
        assert!(config.marker.enabled);
    }
}
