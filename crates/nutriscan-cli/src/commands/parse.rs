//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::error::Result;
use crate::output::Formatter;
use nutriscan_analyzer::parse_analysis;

/// Execute the parse command.
pub fn execute_parse(args: ParseArgs, formatter: &Formatter) -> Result<()> {
    let reply = super::read_input(args.file.as_deref(), args.stdin)?;
    let analysis = parse_analysis(&reply, args.citations);

    if analysis.is_empty() {
        eprintln!("{}", formatter.warning("No analysis sections found in input"));
    }
    println!("{}", formatter.format_analysis(&analysis)?);
    Ok(())
}
