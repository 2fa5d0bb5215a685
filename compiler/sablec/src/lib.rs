//! Sable is a small statically typed imperative language.
//!
//! Related crates of the compiler:
//! - [sablec_lexer], turns the source text into [tokens]
//! - [sablec_parser], parses the tokens into an [AST] and resolves names
//!   through the scope stack along the way
//! - [sablec_diag], the diagnostic system, with the sink
//! - [sablec_token], [sablec_ast], [sablec_utils], shared data types
//!
//! This crate is the command line driver tying the stages together.
//!
//! [tokens]: sablec_token::Token
//! [AST]: sablec_ast::AstNode

use std::{
    fs::read_to_string,
    io::{self, stderr},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser as ArgParser;
use termcolor::{ColorChoice, ColorChoiceParseError};
use thiserror::Error;

use sablec_diag::{DiagnosticSink, FileId};
use sablec_lexer::Lexer;
use sablec_parser::Parser;
use sablec_token::TokenKind;

/// The exit code of a build that emitted errors.
pub fn exit_code_compilation_failed() -> ExitCode {
    ExitCode::from(255)
}

#[derive(Debug, Error)]
pub enum CliError {
    /// Diagnostics were emitted and dumped; the exit code says the rest.
    #[error("build diagnostic(s)")]
    BuildDiagnostics,
    #[error("{path}: {err}")]
    FileIoError {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error(transparent)]
    ColorChoiceParseError(#[from] ColorChoiceParseError),
}

/// Sablec CLI args.
#[derive(ArgParser, Debug)]
#[command(about = "Compiler front-end for the Sable programming language.")]
pub struct Cli {
    /// The source file to compile.
    pub input: PathBuf,

    /// Coloring, possible values: 'always', 'always-ansi', 'never' and
    /// 'auto'.
    #[arg(long, default_value_t = String::from("auto"))]
    pub color: String,

    /// Print the token stream to stderr.
    #[arg(long)]
    pub dump_tokens: bool,

    /// Print the AST to stderr.
    #[arg(long)]
    pub dump_ast: bool,
}

pub fn run() -> Result<(), CliError> {
    build(Cli::parse())
}

pub fn build(cli: Cli) -> Result<(), CliError> {
    let color: ColorChoice = cli.color.parse()?;

    // 1. retrieve the source code, file => text
    let source = read_to_string(&cli.input).map_err(|err| CliError::FileIoError {
        path: cli.input.clone(),
        err,
    })?;

    // 2. create the diagnostic sink and register the file
    let input_name = cli.input.display().to_string();
    let sink = DiagnosticSink::new();
    let fid = sink.register_file(input_name.clone(), source.clone());
    assert_eq!(fid, FileId::ROOT);

    //    maybe print the token stream
    if cli.dump_tokens {
        dump_tokens(&source, fid);
    }

    // 3. lexing + parsing, text => AST; the parser drives the lexer one
    //    token at a time
    let lexer = Lexer::new(sink.clone(), source.clone(), fid);
    let mut parser = Parser::new(lexer, sink.clone(), fid);
    let ast = parser.build_ast();

    //    maybe print the AST
    if cli.dump_ast {
        ast.dump(&mut stderr(), &source)
            .expect("failed to dump the ast");
    }

    // 4. a non-zero error count fails the build
    if sink.failed() {
        sink.dump(color);
        if let Some(summary) = sink.summary(&input_name) {
            eprintln!("{summary}");
        }

        return Err(CliError::BuildDiagnostics);
    }

    Ok(())
}

/// Scan the file again with a throwaway sink, printing one token per line.
fn dump_tokens(source: &str, fid: FileId) {
    let mut lexer = Lexer::new(DiagnosticSink::new(), source.to_string(), fid);
    let mut out = stderr();

    loop {
        let token = lexer.scan_token();
        let done = token.kind == TokenKind::Eof || token.kind == TokenKind::Error;

        token
            .dump(&mut out, source)
            .expect("failed to dump a token");

        if done {
            break;
        }
    }
}
