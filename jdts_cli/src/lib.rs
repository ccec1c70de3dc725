use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Keep Javadoc tags consistent across a Java source tree.",
	long_about = "jdts (Javadoc tag setter) inserts, updates and removes Javadoc block tags such \
	              as @author, @since and @version according to a list of tag policies in \
	              `jdts.yml`.\n\nQuick start:\n  jdts init    Create a sample jdts.yml\n  jdts \
	              update  Rewrite Javadoc tags in place\n  jdts check   Verify every tag \
	              already matches the policy\n  jdts list    Show the Javadoc blocks jdts \
	              would touch"
)]
pub struct JdtsCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Path to the config file. Overrides discovery of `jdts.yml` in the
	/// project root.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `jdts.yml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Rewrite Javadoc tags in every Java file under the project root.
	///
	/// Each file is split into Javadoc blocks, every block is classified by
	/// the declaration that follows it, and the configured tag policies are
	/// applied in order. Only files whose content changes are written.
	Update {
		/// Report which files would change without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Print a line diff for each file that changes.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Check that every Javadoc block already satisfies the tag policies.
	///
	/// Nothing is written. Exits with status 1 when at least one file would
	/// be changed by `jdts update`, which makes it suitable for CI.
	Check {
		/// Print a line diff for each file that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List every Javadoc block with its declaration kind and tags.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
