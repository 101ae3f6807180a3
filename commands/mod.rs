pub mod args;

use crate::quadtree::{KnnResult, PRQuadTree, Point, QuadTreeError};
use tracing::info;

pub use args::ArgumentParser;

/// 命令执行错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
    #[error("ERR wrong number of arguments for '{command}' command. Expected {expected}, got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("ERR missing {0} parameter")]
    MissingArgument(&'static str),
    #[error("ERR invalid {name}: '{value}'")]
    InvalidArgument { name: &'static str, value: String },
    #[error("ERR invalid point on line {line}: '{content}'")]
    InvalidPointLine { line: usize, content: String },
    #[error("ERR {0}")]
    Tree(#[from] QuadTreeError),
    #[error("ERR export failed: {0}")]
    Export(String),
}

/// 可在四叉树上执行的命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert(Point),
    Delete(Point),
    Search(Point),
    Range { anchor: Point, radius: f64 },
    Nearest(Point),
    Knn { anchor: Point, k: usize },
    Count,
    Height,
    Points,
    Dump,
    Export,
    Check,
    Clear,
    Help,
    Quit,
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Bool(bool),
    Integer(usize),
    Point(Option<Point>),
    Points(Vec<Point>),
    Neighbors(Vec<KnnResult>),
    Text(String),
    Help,
    Quit,
}

impl Command {
    /// 所有命令名称
    pub const NAMES: [&'static str; 15] = [
        "INSERT", "DELETE", "SEARCH", "RANGE", "NEAREST", "KNN", "COUNT", "HEIGHT", "POINTS",
        "DUMP", "EXPORT", "CHECK", "CLEAR", "HELP", "QUIT",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "INSERT",
            Command::Delete(_) => "DELETE",
            Command::Search(_) => "SEARCH",
            Command::Range { .. } => "RANGE",
            Command::Nearest(_) => "NEAREST",
            Command::Knn { .. } => "KNN",
            Command::Count => "COUNT",
            Command::Height => "HEIGHT",
            Command::Points => "POINTS",
            Command::Dump => "DUMP",
            Command::Export => "EXPORT",
            Command::Check => "CHECK",
            Command::Clear => "CLEAR",
            Command::Help => "HELP",
            Command::Quit => "QUIT",
        }
    }

    /// 解析已分词的命令，命令名大小写不敏感
    pub fn parse(parts: &[String]) -> Result<Self, CommandError> {
        let Some((name, rest)) = parts.split_first() else {
            return Err(CommandError::UnknownCommand(String::new()));
        };

        let command = match name.to_uppercase().as_str() {
            "INSERT" => {
                let args = ArgumentParser::new(rest, "INSERT");
                args.check_arg_count(2)?;
                Command::Insert(args.get_point(0)?)
            }
            "DELETE" => {
                let args = ArgumentParser::new(rest, "DELETE");
                args.check_arg_count(2)?;
                Command::Delete(args.get_point(0)?)
            }
            "SEARCH" => {
                let args = ArgumentParser::new(rest, "SEARCH");
                args.check_arg_count(2)?;
                Command::Search(args.get_point(0)?)
            }
            "RANGE" => {
                let args = ArgumentParser::new(rest, "RANGE");
                args.check_arg_count(3)?;
                Command::Range {
                    anchor: args.get_point(0)?,
                    radius: args.get_radius(2)?,
                }
            }
            "NEAREST" => {
                let args = ArgumentParser::new(rest, "NEAREST");
                args.check_arg_count(2)?;
                Command::Nearest(args.get_point(0)?)
            }
            "KNN" => {
                let args = ArgumentParser::new(rest, "KNN");
                args.check_arg_count(3)?;
                Command::Knn {
                    anchor: args.get_point(0)?,
                    k: args.get_integer(2, "k")?,
                }
            }
            "COUNT" => Self::no_args(rest, "COUNT", Command::Count)?,
            "HEIGHT" => Self::no_args(rest, "HEIGHT", Command::Height)?,
            "POINTS" => Self::no_args(rest, "POINTS", Command::Points)?,
            "DUMP" => Self::no_args(rest, "DUMP", Command::Dump)?,
            "EXPORT" => Self::no_args(rest, "EXPORT", Command::Export)?,
            "CHECK" => Self::no_args(rest, "CHECK", Command::Check)?,
            "CLEAR" => Self::no_args(rest, "CLEAR", Command::Clear)?,
            "HELP" => Command::Help,
            "QUIT" | "EXIT" => Command::Quit,
            _ => return Err(CommandError::UnknownCommand(name.clone())),
        };
        Ok(command)
    }

    fn no_args(rest: &[String], name: &'static str, command: Command) -> Result<Self, CommandError> {
        ArgumentParser::new(rest, name).check_arg_count(0)?;
        Ok(command)
    }

    /// 在树上执行命令
    pub fn execute(&self, tree: &mut PRQuadTree) -> Result<Reply, CommandError> {
        let reply = match self {
            Command::Insert(point) => Reply::Bool(tree.insert(*point)?),
            Command::Delete(point) => Reply::Bool(tree.delete(point)),
            Command::Search(point) => Reply::Bool(tree.search(point)),
            Command::Range { anchor, radius } => Reply::Points(tree.range(anchor, *radius)),
            Command::Nearest(anchor) => Reply::Point(tree.nearest_neighbor(anchor)),
            Command::Knn { anchor, k } => Reply::Neighbors(tree.knn_search(*k, anchor)),
            Command::Count => Reply::Integer(tree.count()),
            Command::Height => Reply::Integer(tree.height()),
            Command::Points => Reply::Points(tree.points()),
            Command::Dump => Reply::Text(tree.format_tree_structure()),
            Command::Export => Reply::Text(
                tree.export_to_json()
                    .map_err(|e| CommandError::Export(e.to_string()))?,
            ),
            Command::Check => {
                tree.validate()?;
                Reply::Ok
            }
            Command::Clear => {
                info!("clearing {} points", tree.count());
                tree.clear();
                Reply::Ok
            }
            Command::Help => Reply::Help,
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }
}

/// 把一行输入切分为命令和参数，逗号和空白都视为分隔符
pub fn split_command_line(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

/// 解析点文件内容：每行一个 `x y` 或 `x,y`，空行和 `#` 开头的注释行被忽略
pub fn parse_points(content: &str) -> Result<Vec<Point>, CommandError> {
    let mut points = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = || CommandError::InvalidPointLine {
            line: index + 1,
            content: line.to_string(),
        };
        let parts = split_command_line(line);
        if parts.len() != 2 {
            return Err(invalid());
        }
        let x = parts[0].parse::<i32>().map_err(|_| invalid())?;
        let y = parts[1].parse::<i32>().map_err(|_| invalid())?;
        points.push(Point::new(x, y));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        Command::parse(&split_command_line(line))
    }

    fn run(tree: &mut PRQuadTree, line: &str) -> Result<Reply, CommandError> {
        parse(line)?.execute(tree)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("insert 1 2"), Ok(Command::Insert(Point::new(1, 2))));
        assert_eq!(parse("SEARCH 1,2"), Ok(Command::Search(Point::new(1, 2))));
        assert_eq!(
            parse("RANGE 3 4 2.5"),
            Ok(Command::Range {
                anchor: Point::new(3, 4),
                radius: 2.5
            })
        );
        assert_eq!(
            parse("knn 0 0 3"),
            Ok(Command::Knn {
                anchor: Point::new(0, 0),
                k: 3
            })
        );
        assert_eq!(parse("exit"), Ok(Command::Quit));
        assert_eq!(parse("count").unwrap().name(), "COUNT");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse("FLY 1 2"),
            Err(CommandError::UnknownCommand("FLY".to_string()))
        );
        assert!(matches!(
            parse("INSERT 1"),
            Err(CommandError::WrongArity { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            parse("COUNT 1"),
            Err(CommandError::WrongArity { expected: 0, .. })
        ));
        assert!(matches!(
            parse("RANGE 0 0 -1"),
            Err(CommandError::InvalidArgument { name: "radius", .. })
        ));
        assert!(parse("").is_err());
    }

    #[test]
    fn test_every_name_parses() {
        for name in Command::NAMES {
            let line = match name {
                "INSERT" | "DELETE" | "SEARCH" | "NEAREST" => format!("{} 1 1", name),
                "RANGE" | "KNN" => format!("{} 1 1 2", name),
                _ => name.to_string(),
            };
            assert_eq!(parse(&line).unwrap().name(), name);
        }
    }

    #[test]
    fn test_execute_session() {
        let mut tree = PRQuadTree::new(4, 1).unwrap();
        assert_eq!(run(&mut tree, "INSERT 1 1"), Ok(Reply::Bool(true)));
        assert_eq!(run(&mut tree, "INSERT 1 1"), Ok(Reply::Bool(false)));
        assert_eq!(run(&mut tree, "INSERT 9 9"), Ok(Reply::Bool(true)));
        assert_eq!(run(&mut tree, "COUNT"), Ok(Reply::Integer(2)));
        assert_eq!(run(&mut tree, "HEIGHT"), Ok(Reply::Integer(1)));
        assert_eq!(run(&mut tree, "SEARCH 9 9"), Ok(Reply::Bool(true)));
        assert_eq!(
            run(&mut tree, "NEAREST 2 2"),
            Ok(Reply::Point(Some(Point::new(1, 1))))
        );
        assert_eq!(
            run(&mut tree, "RANGE 1 1 20"),
            Ok(Reply::Points(vec![Point::new(9, 9)]))
        );
        assert_eq!(run(&mut tree, "CHECK"), Ok(Reply::Ok));
        assert_eq!(run(&mut tree, "DELETE 1 1"), Ok(Reply::Bool(true)));
        assert_eq!(run(&mut tree, "DELETE 1 1"), Ok(Reply::Bool(false)));
        assert_eq!(run(&mut tree, "CLEAR"), Ok(Reply::Ok));
        assert_eq!(run(&mut tree, "COUNT"), Ok(Reply::Integer(0)));
        assert_eq!(run(&mut tree, "QUIT"), Ok(Reply::Quit));
    }

    #[test]
    fn test_execute_reports_tree_errors() {
        let mut tree = PRQuadTree::new(4, 1).unwrap();
        assert!(matches!(
            run(&mut tree, "INSERT 16 0"),
            Err(CommandError::Tree(QuadTreeError::OutOfBounds { .. }))
        ));
        assert!(matches!(run(&mut tree, "EXPORT"), Ok(Reply::Text(_))));
    }

    #[test]
    fn test_parse_points() {
        let content = "# sample\n1 2\n\n3,4\n 5 , 6 \n";
        assert_eq!(
            parse_points(content),
            Ok(vec![Point::new(1, 2), Point::new(3, 4), Point::new(5, 6)])
        );
        assert_eq!(
            parse_points("1 2\n3\n"),
            Err(CommandError::InvalidPointLine {
                line: 2,
                content: "3".to_string()
            })
        );
    }
}
