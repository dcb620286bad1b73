use std::num::ParseIntError;

use snafu::prelude::*;

use crate::namespace::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Insertion order.
    All,
    /// Most recent first.
    Latest,
    /// Drained from the arrival queue.
    Oldest,
}

/// One parsed shell line. Names are single segments and borrow from the
/// input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    CreateFile(&'a str),
    CreateDirectory(&'a str),
    ChangeDirectory(&'a str),
    Find(&'a str),
    FindInAll(&'a str),
    Write { file: &'a str, text: &'a str },
    Read(&'a str),
    List(ListOrder),
    Delete(&'a str),
    Sort,
    Lookup(NodeId),
    SetId { name: &'a str, id: NodeId },
    Pwd,
    Help,
    Exit,
}

pub const HELP: &str = "\
touch <name>          create a file in the current directory
mkdir <name>          create a directory in the current directory
cd <name|..|/>        change the current directory
find <name>           search below the current directory
findall <name>        search the whole tree
write <file> <text>   replace the content of a file
cat <file>            print the content of a file
ls                    list children in creation order
ls-latest             list children, newest first
ls-oldest             list children, oldest first
rm <name>             delete a child and everything below it
sort                  list children ordered by id
lookup <id>           find a child by id
setid <name> <id>     override the id of a child
pwd                   print the current path
help                  show this help
exit                  leave the shell
";

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn single_arg<'a>(
    command: &str,
    rest: &'a str,
    argument: &'static str,
) -> Result<&'a str, CommandParseError> {
    let (value, extra) = split_word(rest);
    ensure!(!value.is_empty(), MissingArgumentSnafu { command, argument });
    ensure!(extra.is_empty(), UnexpectedArgumentSnafu { command, extra });
    Ok(value)
}

fn no_args(command: &str, rest: &str) -> Result<(), CommandParseError> {
    ensure!(rest.is_empty(), UnexpectedArgumentSnafu { command, extra: rest });
    Ok(())
}

impl<'a> Command<'a> {
    /// `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &'a str) -> Result<Option<Self>, CommandParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = split_word(line);
        let command = match word {
            "touch" => Command::CreateFile(single_arg(word, rest, "name")?),
            "mkdir" => Command::CreateDirectory(single_arg(word, rest, "name")?),
            "cd" => Command::ChangeDirectory(single_arg(word, rest, "target")?),
            "find" => Command::Find(single_arg(word, rest, "name")?),
            "findall" => Command::FindInAll(single_arg(word, rest, "name")?),
            "write" => {
                let (file, text) = split_word(rest);
                ensure!(
                    !file.is_empty(),
                    MissingArgumentSnafu {
                        command: word,
                        argument: "file"
                    }
                );
                Command::Write { file, text }
            }
            "cat" => Command::Read(single_arg(word, rest, "file")?),
            "ls" => no_args(word, rest).map(|()| Command::List(ListOrder::All))?,
            "ls-latest" => no_args(word, rest).map(|()| Command::List(ListOrder::Latest))?,
            "ls-oldest" => no_args(word, rest).map(|()| Command::List(ListOrder::Oldest))?,
            "rm" => Command::Delete(single_arg(word, rest, "name")?),
            "sort" => no_args(word, rest).map(|()| Command::Sort)?,
            "lookup" => {
                let raw = single_arg(word, rest, "id")?;
                let id = raw.parse::<u64>().context(InvalidIdSnafu { value: raw })?;
                Command::Lookup(NodeId(id))
            }
            "setid" => {
                let (name, rest) = split_word(rest);
                ensure!(
                    !name.is_empty(),
                    MissingArgumentSnafu {
                        command: word,
                        argument: "name"
                    }
                );
                let raw = single_arg(word, rest, "id")?;
                let id = raw.parse::<u64>().context(InvalidIdSnafu { value: raw })?;
                Command::SetId {
                    name,
                    id: NodeId(id),
                }
            }
            "pwd" => no_args(word, rest).map(|()| Command::Pwd)?,
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => return UnknownCommandSnafu { command: other }.fail(),
        };
        Ok(Some(command))
    }
}

#[derive(Debug, Snafu)]
pub enum CommandParseError {
    #[snafu(display("Unknown command '{}', try 'help'", command))]
    UnknownCommand { command: String },
    #[snafu(display("'{}' expects a {}", command, argument))]
    MissingArgument {
        command: String,
        argument: &'static str,
    },
    #[snafu(display("'{}' got unexpected input '{}'", command, extra))]
    UnexpectedArgument { command: String, extra: String },
    #[snafu(display("'{}' is not a valid id", value))]
    InvalidId { value: String, source: ParseIntError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("touch a.txt", Command::CreateFile("a.txt"))]
    #[case("mkdir docs", Command::CreateDirectory("docs"))]
    #[case("cd ..", Command::ChangeDirectory(".."))]
    #[case("cd /", Command::ChangeDirectory("/"))]
    #[case("find x", Command::Find("x"))]
    #[case("findall x", Command::FindInAll("x"))]
    #[case("cat a", Command::Read("a"))]
    #[case("ls", Command::List(ListOrder::All))]
    #[case("ls-latest", Command::List(ListOrder::Latest))]
    #[case("ls-oldest", Command::List(ListOrder::Oldest))]
    #[case("rm a", Command::Delete("a"))]
    #[case("sort", Command::Sort)]
    #[case("lookup 12", Command::Lookup(NodeId(12)))]
    #[case("setid a 40", Command::SetId { name: "a", id: NodeId(40) })]
    #[case("pwd", Command::Pwd)]
    #[case("help", Command::Help)]
    #[case("exit", Command::Exit)]
    #[case("quit", Command::Exit)]
    #[case("   touch   padded  ", Command::CreateFile("padded"))]
    fn parses_commands(#[case] line: &str, #[case] expected: Command<'static>) {
        assert_eq!(Command::parse(line).expect("valid line"), Some(expected));
    }

    #[test]
    fn write_keeps_rest_of_line_as_text() {
        assert_eq!(
            Command::parse("write notes.txt hello  big world").expect("valid line"),
            Some(Command::Write {
                file: "notes.txt",
                text: "hello  big world"
            })
        );
        assert_eq!(
            Command::parse("write notes.txt").expect("valid line"),
            Some(Command::Write {
                file: "notes.txt",
                text: ""
            })
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("# a comment")]
    fn skips_blank_and_comment_lines(#[case] line: &str) {
        assert_eq!(Command::parse(line).expect("valid line"), None);
    }

    #[rstest]
    #[case("touch")]
    #[case("cd")]
    #[case("write")]
    #[case("lookup")]
    #[case("setid")]
    #[case("setid a")]
    fn reports_missing_arguments(#[case] line: &str) {
        assert!(matches!(
            Command::parse(line),
            Err(CommandParseError::MissingArgument { .. })
        ));
    }

    #[rstest]
    #[case("touch a b")]
    #[case("ls now")]
    #[case("pwd here")]
    fn reports_unexpected_arguments(#[case] line: &str) {
        assert!(matches!(
            Command::parse(line),
            Err(CommandParseError::UnexpectedArgument { .. })
        ));
    }

    #[rstest]
    #[case("lookup abc")]
    #[case("lookup -1")]
    #[case("setid a x")]
    fn reports_invalid_ids(#[case] line: &str) {
        assert!(matches!(
            Command::parse(line),
            Err(CommandParseError::InvalidId { .. })
        ));
    }

    #[test]
    fn reports_unknown_commands() {
        let error = Command::parse("format c:").expect_err("unknown command");
        assert_eq!(error.to_string(), "Unknown command 'format', try 'help'");
    }
}
