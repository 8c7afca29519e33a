use clap::{value_parser, crate_version, Arg, ArgAction, Command};

const SETTINGS_HELP: &str = "JSON object with any of the keys
`{\"tokenizer\":{\"autoStep\":10},\"detokenizer\":{\"lineNumberWidth\":4,\"maxLines\":10000},\"renumber\":{\"step\":5}}`";

fn settings_arg() -> Arg {
    Arg::new("settings").long("settings").value_name("JSON").help("modify settings")
        .long_help(SETTINGS_HELP)
        .required(false)
}

fn raw_arg() -> Arg {
    Arg::new("raw").long("raw").help("write bare line records without the +3DOS header")
        .required(false)
        .action(ArgAction::SetTrue)
}

fn console_arg() -> Arg {
    Arg::new("console").long("console").help("format for console unconditionally")
        .required(false)
        .action(ArgAction::SetTrue)
        .long_help("even if the output context is a file or pipe, format it for the console")
}

pub fn build_cli() -> Command {
    let long_help = "nextbasic is always invoked with exactly one of several subcommands.
The subcommands are designed to function as nodes in a pipeline.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
tokenize to file:      `nextbasic tokenize < prog.txt > PROG.BAS`
add +3DOS header:      `nextbasic tokenize -b -a 10 < prog.bin > PROG.BAS`
detokenize:            `nextbasic detokenize -n prog < PROG.BAS > prog.txt`
renumber by 5:         `nextbasic renumber -s 5 < prog.txt > renum.txt`
round trip:            `nextbasic tok < prog.txt | nextbasic dtok`
machine code loader:   `nextbasic loader -n game -s 32768 > LOADER.BAS`";

    let mut main_cmd = Command::new("nextbasic")
        .about("Tokenize, detokenize, and renumber ZX Spectrum Next BASIC programs.")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("tokenize")
            .arg(raw_arg())
            .arg(console_arg())
            .arg(settings_arg())
            .arg(Arg::new("binary").short('b').long("binary").help("input is tokenized lines, only add the +3DOS header")
                .required(false)
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["raw","settings"])
            )
            .arg(Arg::new("autostart").short('a').long("autostart").value_name("LINE").help("line to run after loading")
                .required(false)
                .value_parser(value_parser!(u16).range(0..10000))
                .long_help("line to run after loading, overrides any `#autostart` line")
            )
            .visible_alias("tok")
            .about("read program text from stdin, tokenize, write to stdout")
            .after_help("`#program` and `#autostart` lines are placed in the +3DOS header"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("detokenize")
            .arg(Arg::new("name").short('n').long("name").value_name("NAME").help("program name for the `#program` line")
                .required(false)
            )
            .arg(settings_arg())
            .visible_alias("dtok")
            .about("read tokenized program from stdin, detokenize, write to stdout")
            .after_help("input may be a +3DOS file or bare line records"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("renumber")
            .arg(Arg::new("step").short('s').long("step").value_name("NUM").help("step between numbers")
                .required(false)
                .value_parser(value_parser!(u16))
                .long_help("step between numbers, also the first number, omit to choose by program size")
            )
            .arg(settings_arg())
            .about("read program text from stdin, renumber, write to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("loader")
            .arg(Arg::new("name").short('n').long("name").value_name("NAME").help("name of the machine code file")
                .required(true)
            )
            .arg(Arg::new("start").short('s').long("start").value_name("ADDRESS").help("load and start address")
                .required(false)
                .value_parser(value_parser!(u16).range(1..))
                .default_value("32768")
            )
            .arg(raw_arg())
            .arg(console_arg())
            .about("write a tokenized program that loads and runs machine code"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                Arg::new("shell").short('s').long("shell").help("shell target").value_name("NAME")
                    .required(true)
                    .value_parser(["bash","elv","fish","ps1","zsh"])
            )
            .about("write completions script to stdout for the specified shell")
    );
    return main_cmd;
}
