use anyhow::Result;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Print the initial graph as JSON and exit.
    pub dump: bool,
}

pub fn parse_args() -> Result<Args> {
    parse_args_from(std::env::args_os().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--data" {
            let Some(path) = args.next() else {
                anyhow::bail!("--data expects a directory");
            };
            out.data_dir = Some(PathBuf::from(path));
        } else if arg == "--config" {
            let Some(path) = args.next() else {
                anyhow::bail!("--config expects a file");
            };
            out.config = Some(PathBuf::from(path));
        } else if arg == "--dump" {
            out.dump = true;
        } else {
            anyhow::bail!("unknown argument: {:?}", arg);
        }
    }

    Ok(out)
}
