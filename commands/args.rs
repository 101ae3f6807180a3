use super::CommandError;
use crate::quadtree::Point;

/// 参数解析工具
pub struct ArgumentParser<'a> {
    args: &'a [String],
    command_name: &'static str,
}

impl<'a> ArgumentParser<'a> {
    pub fn new(args: &'a [String], command_name: &'static str) -> Self {
        Self { args, command_name }
    }

    /// 检查参数数量
    pub fn check_arg_count(&self, expected: usize) -> Result<(), CommandError> {
        if self.args.len() != expected {
            return Err(CommandError::WrongArity {
                command: self.command_name,
                expected,
                got: self.args.len(),
            });
        }
        Ok(())
    }

    /// 获取字符串参数
    pub fn get_string(&self, index: usize, param_name: &'static str) -> Result<&'a str, CommandError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or(CommandError::MissingArgument(param_name))
    }

    /// 获取坐标参数
    pub fn get_coordinate(&self, index: usize, param_name: &'static str) -> Result<i32, CommandError> {
        let value = self.get_string(index, param_name)?;
        value.parse::<i32>().map_err(|_| CommandError::InvalidArgument {
            name: param_name,
            value: value.to_string(),
        })
    }

    /// 从 `index` 和 `index + 1` 读取一个点
    pub fn get_point(&self, index: usize) -> Result<Point, CommandError> {
        Ok(Point::new(
            self.get_coordinate(index, "x")?,
            self.get_coordinate(index + 1, "y")?,
        ))
    }

    /// 获取非负半径
    pub fn get_radius(&self, index: usize) -> Result<f64, CommandError> {
        let value = self.get_string(index, "radius")?;
        match value.parse::<f64>() {
            Ok(radius) if radius.is_finite() && radius >= 0.0 => Ok(radius),
            _ => Err(CommandError::InvalidArgument {
                name: "radius",
                value: value.to_string(),
            }),
        }
    }

    /// 获取整数参数
    pub fn get_integer(&self, index: usize, param_name: &'static str) -> Result<usize, CommandError> {
        let value = self.get_string(index, param_name)?;
        value.parse::<usize>().map_err(|_| CommandError::InvalidArgument {
            name: param_name,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_point() {
        let values = args(&["3", "-4"]);
        let parser = ArgumentParser::new(&values, "SEARCH");
        assert_eq!(parser.get_point(0).unwrap(), Point::new(3, -4));
    }

    #[test]
    fn test_invalid_values() {
        let values = args(&["a", "1", "-2.5"]);
        let parser = ArgumentParser::new(&values, "RANGE");
        assert_eq!(
            parser.get_coordinate(0, "x"),
            Err(CommandError::InvalidArgument {
                name: "x",
                value: "a".to_string()
            })
        );
        assert!(parser.get_radius(2).is_err());
        assert_eq!(
            parser.get_string(5, "k"),
            Err(CommandError::MissingArgument("k"))
        );
    }

    #[test]
    fn test_check_arg_count() {
        let values = args(&["1"]);
        let parser = ArgumentParser::new(&values, "INSERT");
        assert_eq!(
            parser.check_arg_count(2),
            Err(CommandError::WrongArity {
                command: "INSERT",
                expected: 2,
                got: 1
            })
        );
    }
}
