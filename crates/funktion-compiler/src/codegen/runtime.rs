//! Emitted runtime helpers
//!
//! The generated program carries a small stateful streaming runtime: an
//! axis descriptor (`generateRange`), stream cells with an append-only
//! history (`initializeCell`), advancement (`advanceCell`), the most-recent
//! read (`cellLatest`) and printing (`funktionPrint`). A virgin cell is
//! primed with the axis origin value itself, so a recurrence's first
//! history entry exists before the user function ever reads the previous
//! value. Travel direction is forced toward the end bound regardless of the
//! step's literal sign; open-ended axes run to Infinity.

/// Readline setup emitted at the very top of every program
pub(crate) const READLINE_PRELUDE: &str = r#"import { createInterface } from "node:readline/promises";
import { stdin as input, stdout as output } from "node:process";
const rl = createInterface({ input, output });"#;

/// Final statement of every program
pub(crate) const CLOSE_STMT: &str = "rl.close();";

const RANGE_BODY: &str = r#"  if (end < start && step > 0) step *= -1;
  if (start < end && step < 0) step *= -1;
  return { start, end, step, isChar };
}"#;

const HELPERS: &str = r#"function initializeCell(axis = generateRange()) {
  return { axis, values: [], index: -1, size: 0 };
}

function axisValue(cell, n) {
  return cell.axis.isChar ? String.fromCharCode(n) : n;
}

function cellLatest(cell) {
  return cell.values[cell.index];
}

function funktionPrint(value) {
  if (Array.isArray(value)) {
    console.log(value.join('\n'));
  } else if (typeof value === "object" && value !== null) {
    console.log(value.values.join('\n'));
  } else {
    console.log(value);
  }
}

function advanceCell(cell, iterations, f) {
  if (cell.size === 0) {
    cell.size++;
    cell.index++;
    cell.values.push(axisValue(cell, cell.axis.start));
  }
  let next = cell.axis.start + cell.axis.step * cell.size;
  while (iterations > 0 && (cell.axis.step > 0 ? next <= cell.axis.end : next >= cell.axis.end)) {
    cell.size++;
    cell.index++;
    const result = f(axisValue(cell, next));
    cell.values.push(Array.isArray(result) ? result.join(' ') : result);
    next += cell.axis.step;
    iterations--;
  }
}"#;

/// Runtime helper block with the program's axis defaults baked into
/// `generateRange`.
pub(crate) fn runtime_block(start: &str, end: &str, step: &str, is_char: bool) -> String {
    format!(
        "function generateRange(start = {start}, end = {end}, step = {step}, isChar = {is_char}) {{\n{RANGE_BODY}\n\n{HELPERS}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_defaults_are_baked_into_generate_range() {
        let block = runtime_block("5", "1", "1", false);
        assert!(block.starts_with(
            "function generateRange(start = 5, end = 1, step = 1, isChar = false) {"
        ));
    }

    #[test]
    fn test_runtime_carries_all_helpers() {
        let block = runtime_block("1", "5", "1", false);
        for helper in [
            "function initializeCell",
            "function axisValue",
            "function cellLatest",
            "function funktionPrint",
            "function advanceCell",
        ] {
            assert!(block.contains(helper), "missing {helper}");
        }
    }

    #[test]
    fn test_virgin_cell_is_primed_with_axis_origin() {
        let block = runtime_block("1", "5", "1", false);
        assert!(block.contains("cell.values.push(axisValue(cell, cell.axis.start));"));
    }
}
