//! Tolerant pre-pass over the raw command line
//!
//! The mode is picked by the first argument. In extraction mode the first bare
//! token is the archive, `-o`/`-e` take the next token whatever it looks like,
//! and anything else is dropped so clap never sees an argument it would
//! reject.

use std::ffi::OsString;

/// Flags that select a mode when they come first
const MODE_FLAGS: &[&str] = &[
    "-h",
    "--help",
    "-V",
    "--version",
    "-c",
    "--config",
    "-i",
    "--info",
    "-t",
    "--test",
];

const OUTPUT_FLAGS: &[&str] = &["-o", "--output"];
const ENCODING_FLAGS: &[&str] = &["-e", "--encoding"];

/// Logging switches, accepted anywhere
const SWITCHES: &[&str] = &["--verbose", "--quiet"];

/// Arguments ready for clap, plus what was dropped along the way
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    pub args: Vec<OsString>,
    pub ignored: Vec<OsString>,
}

fn is_one_of(arg: &OsString, set: &[&str]) -> bool {
    arg.to_str().is_some_and(|a| set.contains(&a))
}

/// Normalize the arguments following the program name
pub fn normalize<I>(args: I) -> Normalized
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Normalized::default();
    let mut rest = Vec::new();

    for arg in args {
        if is_one_of(&arg, SWITCHES) {
            if !normalized.args.contains(&arg) {
                normalized.args.push(arg);
            }
        } else {
            rest.push(arg);
        }
    }

    let mut rest = rest.into_iter();
    let Some(first) = rest.next() else {
        return normalized;
    };

    if is_one_of(&first, MODE_FLAGS) {
        normalized.args.push(first);
        normalized.ignored.extend(rest);
        return normalized;
    }

    let mut archive = None;
    let mut output = None;
    let mut encoding = None;
    let mut pending = std::iter::once(first).chain(rest);

    while let Some(arg) = pending.next() {
        let text = arg.to_str().map(str::to_owned);
        match text.as_deref() {
            Some(flag) if OUTPUT_FLAGS.contains(&flag) => match pending.next() {
                Some(value) => output = Some(value),
                None => normalized.ignored.push(arg),
            },
            Some(flag) if ENCODING_FLAGS.contains(&flag) => match pending.next() {
                Some(value) => encoding = Some(value),
                None => normalized.ignored.push(arg),
            },
            Some(flag) if flag.starts_with("--output=") => {
                output = Some(OsString::from(&flag["--output=".len()..]));
            }
            Some(flag) if flag.starts_with("--encoding=") => {
                encoding = Some(OsString::from(&flag["--encoding=".len()..]));
            }
            Some(flag) if flag.starts_with('-') => normalized.ignored.push(arg),
            _ if archive.is_none() => archive = Some(arg),
            _ => normalized.ignored.push(arg),
        }
    }

    // An empty output means "derive it", same as not giving one
    if let Some(output) = output.filter(|o| !o.is_empty()) {
        normalized.args.push(OsString::from("--output"));
        normalized.args.push(output);
    }
    if let Some(encoding) = encoding {
        normalized.args.push(OsString::from("--encoding"));
        normalized.args.push(encoding);
    }
    if let Some(archive) = archive {
        // `--` keeps an archive name like `-x.zip` from being read as a flag
        normalized.args.push(OsString::from("--"));
        normalized.args.push(archive);
    }

    normalized
}
