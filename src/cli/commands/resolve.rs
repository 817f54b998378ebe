//! `dxb resolve` command - area aliases and developer lookup
//!
//! Pure lookups; no data source is opened.

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::print_structured;
use crate::cli::GlobalOpts;
use crate::core::aliases::{lookup_area_alias, resolve_area_name};
use crate::core::developers::get_developer;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ResolveCommands {
    /// Canonical area name for an alias or loosely typed name
    Area {
        /// Alias or name, e.g. "jvc" or "dubai-hills"
        input: String,
    },

    /// Developer behind a master project or project name
    Developer {
        /// Master project name
        #[arg(long, short = 'm')]
        master: Option<String>,

        /// Project name
        #[arg(long, short = 'p')]
        project: Option<String>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AreaResolution {
    pub input: String,
    pub area_name: String,
    /// The input matched a known alias
    pub alias: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DeveloperResolution {
    pub master_project: Option<String>,
    pub project_name: Option<String>,
    pub developer: Option<&'static str>,
}

pub fn resolve_area(input: &str) -> AreaResolution {
    AreaResolution {
        input: input.to_string(),
        area_name: resolve_area_name(input),
        alias: lookup_area_alias(input).is_some(),
    }
}

pub fn resolve_developer(master: Option<String>, project: Option<String>) -> DeveloperResolution {
    let developer = get_developer(master.as_deref(), project.as_deref());
    DeveloperResolution {
        master_project: master,
        project_name: project,
        developer,
    }
}

pub fn run(cmd: ResolveCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let format = global.output_format(config.default_format.as_deref());

    match cmd {
        ResolveCommands::Area { input } => {
            let resolved = resolve_area(&input);
            if format.is_structured() {
                return print_structured(&resolved, format);
            }
            println!("{}", resolved.area_name);
        }
        ResolveCommands::Developer { master, project } => {
            let resolved = resolve_developer(master, project);
            if format.is_structured() {
                return print_structured(&resolved, format);
            }
            match resolved.developer {
                Some(developer) => println!("{}", developer),
                None => println!("{}", style("unknown").dim()),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alias() {
        let resolved = resolve_area("JVC");
        assert_eq!(resolved.area_name, "Jumeirah Village Circle");
        assert!(resolved.alias);
    }

    #[test]
    fn test_resolve_plain_name() {
        let resolved = resolve_area("al barsha");
        assert_eq!(resolved.area_name, "Al Barsha");
        assert!(!resolved.alias);
    }

    #[test]
    fn test_resolve_developer() {
        let resolved = resolve_developer(Some("Dubai Hills Estate".into()), None);
        assert_eq!(resolved.developer, Some("Emaar"));

        let unknown = resolve_developer(None, Some("Tower X".into()));
        assert_eq!(unknown.developer, None);
        let json = serde_json::to_value(&unknown).unwrap();
        assert!(json["developer"].is_null());
    }
}
