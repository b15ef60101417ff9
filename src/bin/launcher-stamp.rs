use alias_launcher::stamp::{read_image, stamp_image};
use alias_launcher::{LauncherConfig, logging, options};
use anyhow::{Context, Result, bail};
use argh::FromArgs;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(FromArgs)]
/// Create and inspect launcher aliases.
struct Cli {
    #[argh(subcommand)]
    command: Subcommand,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Subcommand {
    Create(Create),
    Show(Show),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "create")]
/// Copy a launcher and bake a new target application into the copy.
struct Create {
    #[argh(option)]
    /// launcher binary to copy; defaults to the launcher installed next to this tool
    from: Option<PathBuf>,

    #[argh(option)]
    /// path of the application the alias starts
    target: String,

    #[argh(option)]
    /// behaviour switch to bake in (nonblocking, nostdredirect); repeatable
    option: Vec<String>,

    #[argh(option)]
    /// environment assignment KEY=VALUE to bake in; repeatable
    env: Vec<String>,

    #[argh(positional)]
    /// where to write the alias
    output: PathBuf,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "show")]
/// Print the configuration baked into a launcher.
struct Show {
    #[argh(positional)]
    /// launcher or alias to inspect
    file: PathBuf,
}

fn main() -> Result<()> {
    logging::init("info");
    let cli: Cli = argh::from_env();
    match cli.command {
        Subcommand::Create(create) => create.run(),
        Subcommand::Show(show) => show.run(),
    }
}

/// The `launcher` binary installed alongside this tool.
fn sibling_launcher() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate launcher-stamp")?;
    let dir = exe
        .parent()
        .context("launcher-stamp has no parent directory")?;
    Ok(dir.join(format!("launcher{}", std::env::consts::EXE_SUFFIX)))
}

fn join_list(what: &str, items: &[String]) -> Result<String> {
    if let Some(item) = items.iter().find(|item| item.contains(',')) {
        bail!("{what} `{item}` contains `,`, which separates entries");
    }
    Ok(items.join(","))
}

impl Create {
    fn config(&self) -> Result<LauncherConfig> {
        if self.target.is_empty() {
            bail!("--target must not be empty");
        }
        for token in &self.option {
            if !options::is_known(token) {
                tracing::warn!(token, "unknown option, the launcher will ignore it");
            }
        }
        for pair in &self.env {
            if !pair.contains('=') {
                tracing::warn!(
                    entry = pair,
                    "no `=` in assignment, the launcher will skip it"
                );
            }
        }
        Ok(LauncherConfig::new(
            self.target.as_str(),
            join_list("option", &self.option)?,
            join_list("assignment", &self.env)?,
        ))
    }

    fn run(self) -> Result<()> {
        let config = self.config()?;
        let from = match &self.from {
            Some(from) => from.clone(),
            None => sibling_launcher()?,
        };
        let mut image =
            fs::read(&from).with_context(|| format!("cannot read {}", from.display()))?;
        stamp_image(&mut image, &config)
            .with_context(|| format!("cannot stamp {}", from.display()))?;
        write_executable(&self.output, &image, &from)?;
        tracing::info!(
            alias = %self.output.display(),
            app = %config.target,
            options = %config.options,
            env = %config.env,
            "alias created"
        );
        Ok(())
    }
}

fn write_executable(output: &Path, image: &[u8], template: &Path) -> Result<()> {
    let permissions = fs::metadata(template)
        .with_context(|| format!("cannot read permissions of {}", template.display()))?
        .permissions();
    fs::write(output, image).with_context(|| format!("cannot write {}", output.display()))?;
    fs::set_permissions(output, permissions)
        .with_context(|| format!("cannot set permissions of {}", output.display()))?;
    Ok(())
}

impl Show {
    fn run(self) -> Result<()> {
        let image =
            fs::read(&self.file).with_context(|| format!("cannot read {}", self.file.display()))?;
        let config = read_image(&image)
            .with_context(|| format!("cannot inspect {}", self.file.display()))?;
        println!("target:  {}", config.target);
        println!("options: {}", config.options);
        println!("env:     {}", config.env);
        Ok(())
    }
}
