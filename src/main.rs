// Copyright © 2019 Felix Obenhuber
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use clap::{crate_authors, crate_name, crate_version, App, AppSettings, Arg, ArgMatches};
use failure::{err_msg, format_err, Error};
use futures::Future;
use linedrain::{command, LineCollector, Malformed, TextEncoding};
use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
    process::exit,
};
use tokio::runtime::Runtime;

mod utils;

fn cli() -> App<'static, 'static> {
    App::new(crate_name!())
        .setting(AppSettings::ColoredHelp)
        .setting(AppSettings::TrailingVarArg)
        .version(crate_version!())
        .author(crate_authors!())
        .about("Collect decoded text lines from a file, a command or stdin")
        .arg_from_usage("-e --encoding [ENCODING] 'Encoding of the input, e.g. UTF-8, latin1 or Shift_JIS'")
        .arg_from_usage("--strict 'Fail on malformed input instead of replacing it'")
        .arg_from_usage("--tee 'Log lines while they are read'")
        .arg(Arg::from_usage("-i --input [FILE] 'Read from file instead of stdin'").conflicts_with("COMMAND"))
        .arg(Arg::from_usage("[COMMAND]... 'Run command through the shell and collect its output'"))
}

fn encoding(args: &ArgMatches) -> Result<TextEncoding, Error> {
    let label = args
        .value_of("encoding")
        .map(ToOwned::to_owned)
        .or_else(|| utils::config_get::<String>("encoding"));
    let encoding = match label {
        Some(label) => TextEncoding::for_label(&label)?,
        None => TextEncoding::default(),
    };

    let malformed = if args.is_present("strict") {
        Malformed::Fail
    } else {
        utils::config_get::<String>("malformed")
            .map(|m| m.parse::<Malformed>().map_err(err_msg))
            .transpose()?
            .unwrap_or_default()
    };

    Ok(encoding.malformed(malformed))
}

fn print(lines: &[String]) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn run(args: &ArgMatches, tee: bool) -> Result<i32, Error> {
    let encoding = encoding(args)?;

    if let Some(cmd) = args.values_of("COMMAND") {
        let cmd = cmd.collect::<Vec<&str>>().join(" ");
        let output = command::run(command::shell(&cmd), encoding, tee)?;
        print(&output.stdout)?;
        for line in &output.stderr {
            eprintln!("{}", line);
        }
        return match output.error {
            Some(e) => Err(e.into()),
            None => Ok(output.status.code().unwrap_or(1)),
        };
    }

    let result = if let Some(file) = args.value_of("input") {
        let path = PathBuf::from(file);
        let file = File::open(&path)
            .map_err(|e| format_err!("Failed to open {}: {}", path.display(), e))?;
        LineCollector::new(file)
            .encoding(encoding)
            .name("input")
            .tee(tee)
            .spawn()?
            .wait()
    } else {
        if atty::is(atty::Stream::Stdin) {
            return Err(err_msg(
                "Refusing to read from a terminal. Pipe something in or use --input",
            ));
        }
        let runtime = Runtime::new()?;
        LineCollector::new(tokio::io::stdin())
            .encoding(encoding)
            .name("stdin")
            .tee(tee)
            .spawn_on(&runtime.executor())?
            .wait()
    };

    match result {
        Ok(lines) => {
            print(&lines)?;
            Ok(0)
        }
        Err(e) => {
            print(e.lines())?;
            Err(e.into())
        }
    }
}

fn main() {
    let args = cli().get_matches();

    utils::config_init();
    let tee = args.is_present("tee") || utils::config_get::<bool>("tee").unwrap_or(false);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if tee { "info" } else { "warn" }),
    )
    .init();

    match run(&args, tee) {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}
