use super::{CORNER_LABEL, display_subject};
use crate::routine::RoutineData;

const TABLE_STYLE: &str = "\
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #444; padding: 6px 8px; text-align: center; }
th { background: #e8eef7; }
td.class-name { font-weight: bold; text-align: left; background: #f6f6f6; }
h1 { font-family: Arial, sans-serif; text-align: center; }";

const WORD_PAGE_STYLE: &str = "\
@page Section1 { size: 11.0in 8.5in; mso-page-orientation: landscape; margin: 0.75in; }
div.Section1 { page: Section1; }";

/// HTML that word processors open as a document (landscape, print view).
pub fn word_document(data: &RoutineData, title: &str) -> String {
    let title = escape_html(title);
    let mut out = String::new();
    out.push_str(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n",
    );
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str(
        "<!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View>\
         <w:Zoom>100</w:Zoom><w:DoNotOptimizeForBrowser/></w:WordDocument></xml><![endif]-->\n",
    );
    out.push_str(&format!(
        "<style>\n{WORD_PAGE_STYLE}\n{TABLE_STYLE}\n</style>\n"
    ));
    out.push_str("</head>\n<body>\n<div class=\"Section1\">\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));
    out.push_str(&routine_table(data));
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

pub fn html_document(data: &RoutineData, title: &str) -> String {
    let title = escape_html(title);
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str(&format!("<style>\n{TABLE_STYLE}\n</style>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));
    out.push_str(&routine_table(data));
    out.push_str("</body>\n</html>\n");
    out
}

fn routine_table(data: &RoutineData) -> String {
    let mut out = String::from("<table>\n<thead>\n<tr>");
    out.push_str(&format!("<th>{}</th>", escape_html(CORNER_LABEL)));
    for date in data.dates() {
        out.push_str(&format!("<th>{}</th>", escape_html(date)));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for class in data.classes() {
        out.push_str("<tr>");
        out.push_str(&format!(
            "<td class=\"class-name\">{}</td>",
            escape_html(class.name())
        ));
        for subject in class.subjects() {
            out.push_str(&format!("<td>{}</td>", escape_html(display_subject(subject))));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
