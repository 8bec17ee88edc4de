//! Pretty-print the AST into a human readable format.
//!
//! Based upon this [blog post](https://www.georgevreilly.com/blog/2023/01/24/TreeInRust2PrintingTrees.html)

use super::{AST, node::*, statement::*};
use std::fmt;

impl fmt::Display for AST {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let has_connections = !self.file.connections.connections.is_empty();

    for (index, statement) in self.file.statements.iter().enumerate() {
      let last = !has_connections && index + 1 == self.file.statements.len();
      statement.pretty(f, "", last)?;
    }

    if has_connections {
      self.file.connections.pretty(f, "", true)?;
    }

    Ok(())
  }
}

const OTHER_CHILD: &str = "│  ";
const OTHER_ENTRY: &str = "├─ ";
const FINAL_CHILD: &str = "   ";
const FINAL_ENTRY: &str = "╰─ ";

trait PrettyPrint {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result;
}

fn pretty_children<'a, T: PrettyPrint + 'a>(
  f: &mut fmt::Formatter,
  prefix: &str,
  last: bool,
  children: impl IntoIterator<Item = &'a T>,
) -> fmt::Result {
  let children: Vec<_> = children.into_iter().collect();
  let new_prefix = format!("{prefix}{}", if last { FINAL_CHILD } else { OTHER_CHILD });

  if let Some((final_child, children)) = children.split_last() {
    for child in children {
      child.pretty(f, &new_prefix, false)?;
    }
    final_child.pretty(f, &new_prefix, true)?;
  }

  Ok(())
}

impl PrettyPrint for Assignment {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
    writeln!(f, "{prefix}{connector}Assignment ({})", self.lhs)?;

    let new_prefix = format!("{prefix}{}", if last { FINAL_CHILD } else { OTHER_CHILD });
    self.rhs.pretty(f, &new_prefix, true)
  }
}
impl PrettyPrint for Connection {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
    writeln!(f, "{prefix}{connector}Connections")?;

    let new_prefix = format!("{prefix}{}", if last { FINAL_CHILD } else { OTHER_CHILD });
    if let Some(((from, to), edges)) = self.connections.split_last() {
      for (a, b) in edges {
        writeln!(f, "{new_prefix}{OTHER_ENTRY}{a} -> {b}")?;
      }
      writeln!(f, "{new_prefix}{FINAL_ENTRY}{from} -> {to}")?;
    }

    Ok(())
  }
}

impl PrettyPrint for Node {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };

    match self {
      Self::Number(number) => writeln!(f, "{prefix}{connector}Number ({})", number.value),
      Self::String(string) => writeln!(f, "{prefix}{connector}String '{}'", string.inner()),
      Self::Ident(ident) => writeln!(f, "{prefix}{connector}Variable ({ident})"),
      Self::DotPath(path) => writeln!(f, "{prefix}{connector}Path ({path})"),
      Self::Expr(expr) => expr.pretty(f, prefix, last),
      Self::JsonObj(object) => object.pretty(f, prefix, last),
      Self::List(list) => {
        writeln!(f, "{prefix}{connector}List")?;
        pretty_children(f, prefix, last, &list.items)
      }
      Self::Component(component) => component.pretty(f, prefix, last),
    }
  }
}
impl PrettyPrint for Expr {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
    write!(f, "{prefix}{connector}Expression (")?;
    for (index, (operator, _)) in self.operators().enumerate() {
      if index > 0 {
        write!(f, " ")?;
      }
      write!(f, "{operator}")?;
    }
    writeln!(f, ")")?;

    pretty_children(f, prefix, last, self.operands())
  }
}
impl PrettyPrint for JsonObj {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
    writeln!(f, "{prefix}{connector}Object")?;

    pretty_children(f, prefix, last, &self.properties)
  }
}
impl PrettyPrint for JsonProperty {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
    writeln!(f, "{prefix}{connector}Property ({})", self.key)?;

    let new_prefix = format!("{prefix}{}", if last { FINAL_CHILD } else { OTHER_CHILD });
    self.value.pretty(f, &new_prefix, true)
  }
}
impl PrettyPrint for Component {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
    writeln!(f, "{prefix}{connector}Component ({})", self.type_name)?;

    pretty_children(f, prefix, last, &self.args)
  }
}
impl PrettyPrint for ComponentCtorArg {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    match &self.name {
      Some(name) => {
        let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
        writeln!(f, "{prefix}{connector}Argument ({name})")?;

        let new_prefix = format!("{prefix}{}", if last { FINAL_CHILD } else { OTHER_CHILD });
        self.value.pretty(f, &new_prefix, true)
      }
      None => self.value.pretty(f, prefix, last),
    }
  }
}
