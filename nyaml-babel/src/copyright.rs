//! Copyright header of generated NXDL files
//!
//! Every NXDL file opens with the NIAC LGPL notice as an XML comment. When an
//! existing output file already carries one, that text is kept so that
//! regenerating a definition does not touch its copyright years.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

const YEAR_PLACEHOLDER: &str = "__COPYRIGHT_YEAR__";

const TEMPLATE: &str = "# NeXus - Neutron and X-ray Common Data Format
#
# Copyright (C) __COPYRIGHT_YEAR__ NeXus International Advisory Committee (NIAC)
#
# This library is free software; you can redistribute it and/or
# modify it under the terms of the GNU Lesser General Public
# License as published by the Free Software Foundation; either
# version 3 of the License, or (at your option) any later version.
#
# This library is distributed in the hope that it will be useful,
# but WITHOUT ANY WARRANTY; without even the implied warranty of
# MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
# Lesser General Public License for more details.
#
# You should have received a copy of the GNU Lesser General Public
# License along with this library; if not, write to the Free Software
# Foundation, Inc., 59 Temple Place, Suite 330, Boston, MA  02111-1307  USA
#
# For further information, see http://www.nexusformat.org
";

static COPYRIGHT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)NeXus - Neutron and X-ray Common Data Format.*Copyright \(C\)")
        .expect("valid regex")
});

static XML_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("valid regex"));

/// Notice for `year`, rendered as `year-year`.
pub fn for_year(year: i32) -> String {
    TEMPLATE.replace(YEAR_PLACEHOLDER, &format!("{year}-{year}"))
}

/// Notice for the current calendar year.
pub fn current() -> String {
    for_year(chrono::Local::now().year())
}

/// Whether a comment body is the copyright notice.
pub fn is_copyright_comment(text: &str) -> bool {
    COPYRIGHT_PATTERN.is_match(text)
}

/// The copyright comment of an existing NXDL file, if it has one.
///
/// Only comments in front of the `<definition` tag are considered. The body is
/// returned without its leading newline, ready to be written between `<!--`
/// and `-->` again.
pub fn from_nxdl(xml: &str) -> Option<String> {
    let head = match xml.find("<definition") {
        Some(end) => &xml[..end],
        None => xml,
    };
    XML_COMMENT
        .captures_iter(head)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|body| is_copyright_comment(body))
        .map(|body| body.strip_prefix('\n').unwrap_or(body).to_string())
}
