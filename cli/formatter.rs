use crate::commands::{Command, Reply};
use crate::quadtree::{KnnResult, Point};
use colored::*;

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_reply(reply: &Reply) -> String {
        match reply {
            Reply::Ok => "OK".green().to_string(),
            Reply::Bool(value) => Self::format_bool(*value),
            Reply::Integer(i) => format!("(integer) {}", i.to_string().cyan()),
            Reply::Point(Some(point)) => point.to_string(),
            Reply::Point(None) => "(nil)".red().to_string(),
            Reply::Points(points) => Self::format_points(points),
            Reply::Neighbors(results) => Self::format_neighbors(results),
            Reply::Text(text) => text.trim_end().to_string(),
            Reply::Help => Self::format_help_message(),
            Reply::Quit => "Bye".green().to_string(),
        }
    }

    fn format_bool(value: bool) -> String {
        if value {
            "(true)".green().to_string()
        } else {
            "(false)".yellow().to_string()
        }
    }

    fn format_points(points: &[Point]) -> String {
        if points.is_empty() {
            return "(empty array)".yellow().to_string();
        }
        points
            .iter()
            .enumerate()
            .map(|(i, point)| format!("{}) {}", (i + 1).to_string().blue(), point))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_neighbors(results: &[KnnResult]) -> String {
        if results.is_empty() {
            return "(empty array)".yellow().to_string();
        }
        results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                format!(
                    "{}) {} {}",
                    (i + 1).to_string().blue(),
                    result.point,
                    format!("d={:.3}", result.distance).cyan()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_error(err: &str) -> String {
        format!("(error) {}", err.red())
    }

    pub fn format_prompt(k: u32, bucket_size: usize) -> String {
        format!(
            "prquad[k={} b={}]> ",
            k.to_string().blue(),
            bucket_size.to_string().blue()
        )
    }

    pub fn format_loaded_message(inserted: usize, total: usize, source: &str) -> String {
        format!(
            "Loaded {} of {} points from {}",
            inserted.to_string().green(),
            total,
            source.cyan()
        )
    }

    pub fn format_help_message() -> String {
        let mut help = String::from("Available commands:\n");
        for name in Command::NAMES {
            let usage = match name {
                "INSERT" => "INSERT x y        - Insert a point",
                "DELETE" => "DELETE x y        - Delete a point",
                "SEARCH" => "SEARCH x y        - Check whether a point is stored",
                "RANGE" => "RANGE x y r       - Points within distance r of (x, y)",
                "NEAREST" => "NEAREST x y       - Nearest point to (x, y)",
                "KNN" => "KNN x y k         - k nearest points to (x, y)",
                "COUNT" => "COUNT             - Number of stored points",
                "HEIGHT" => "HEIGHT            - Height of the tree",
                "POINTS" => "POINTS            - All points in Z-order",
                "DUMP" => "DUMP              - Print the tree structure",
                "EXPORT" => "EXPORT            - Export the tree as JSON",
                "CHECK" => "CHECK             - Validate structural invariants",
                "CLEAR" => "CLEAR             - Remove all points",
                "HELP" => "HELP              - Show this help message",
                _ => "QUIT              - Exit",
            };
            help.push_str("  ");
            help.push_str(usage);
            help.push('\n');
        }
        help.push_str("\nUse Ctrl+D to exit interactive mode.");
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integer() {
        let result = OutputFormatter::format_reply(&Reply::Integer(42));
        // 注意：测试时不检查颜色代码，只检查内容
        assert!(result.contains("42"));
        assert!(result.contains("integer"));
    }

    #[test]
    fn test_format_points() {
        let reply = Reply::Points(vec![Point::new(1, 2), Point::new(3, 4)]);
        let result = OutputFormatter::format_reply(&reply);
        assert!(result.contains("(1, 2)"));
        assert!(result.contains("(3, 4)"));
        assert_eq!(result.lines().count(), 2);

        let result = OutputFormatter::format_reply(&Reply::Points(Vec::new()));
        assert!(result.contains("empty"));
    }

    #[test]
    fn test_format_nil_and_neighbors() {
        assert!(OutputFormatter::format_reply(&Reply::Point(None)).contains("nil"));
        let reply = Reply::Neighbors(vec![KnnResult {
            point: Point::new(3, 4),
            distance: 5.0,
        }]);
        let result = OutputFormatter::format_reply(&reply);
        assert!(result.contains("(3, 4)"));
        assert!(result.contains("5.000"));
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = OutputFormatter::format_help_message();
        for name in Command::NAMES {
            assert!(help.contains(name));
        }
    }
}
