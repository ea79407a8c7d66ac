// src/llm/prompt.rs

/// Instruction template sent as the system message with every table.
pub const SYSTEM_PROMPT: &str = r#"You extract figures from US SEC 10-K income statements.
The user sends one income statement table as text: rows separated by newlines, cells separated by tabs.

The filer may be an ordinary operating company, a bank or other financial institution, or an
insurer (with lines such as "net premiums earned" or "losses and loss adjustment expenses").

Find the column for the most recent fiscal year and report, in absolute amounts (never per share):

1. net_sales: the top line ("Net sales", "Sales", "Revenues", "Total revenue"). Insurers may use
   "Total revenues" or "Net premiums earned" when no sales line exists.
2. cost_of_revenue: "Cost of sales", "Cost of goods sold", "Cost of revenue". null if absent.
3. gross_profit: an explicit "Gross profit" line, else net_sales - cost_of_revenue when both exist,
   else null.
4. operating_income: "Operating income" or "Income from operations"; if neither exists,
   "Income before income taxes" may stand in.
5. net_income: "Net income" or "Net earnings" attributable to the company, excluding
   noncontrolling interests where they are shown separately.
6. depreciation_and_amortization: only if the table shows it; otherwise null.
7. ebitda: an explicit EBITDA line if present, else operating_income + depreciation_and_amortization
   when both exist, else null.

Also give fiscal_year_label (the heading of the chosen column, e.g. "2024" or
"Year ended December 31, 2024"), currency, and units_note (e.g. "in millions", "in thousands").

Respond with exactly one JSON object and nothing else (no prose, no markdown, no code fences):
{
  "fiscal_year_label": string or null,
  "net_sales": number or null,
  "cost_of_revenue": number or null,
  "gross_profit": number or null,
  "operating_income": number or null,
  "net_income": number or null,
  "depreciation_and_amortization": number or null,
  "ebitda": number or null,
  "currency": string or null,
  "units_note": string or null
}
Strip commas and currency symbols; parentheses mean a negative number. Use null for anything
that is not present and cannot reasonably be inferred."#;

/// User message wrapping the flattened table.
pub fn user_message(table_text: &str) -> String {
    format!("Here is the income statement table:\n\n{}", table_text)
}
