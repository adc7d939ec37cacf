//! Generated spreadsheet artifacts.
//!
//! Two fixed templates: a spreadsheet-platform script that imports the CSV
//! export and exposes query helpers, and a standalone dashboard page that
//! calls those helpers. The script carries the CSV inside a JavaScript
//! template literal; `embed_in_template_literal` is the only place payload
//! text enters a template.

use fieldlog_api::SessionRecord;

use crate::csv::to_csv;

/// Marker in `REMOTE_SCRIPT_TEMPLATE` replaced by the escaped CSV payload
pub const CSV_PLACEHOLDER: &str = "__FIELDLOG_CSV_DATA__";

pub const REMOTE_SCRIPT_TEMPLATE: &str = r#"
// Apps Script for managing session report data
// Paste into the Apps Script editor of the target spreadsheet

const SHEET_NAME = 'Session Reports';

const HEADERS = [
  'ID', 'Date', 'Time', 'Duration', 'Grade', 'Boys Attendance',
  'Girls Attendance', 'Topics Taught', 'Teacher Attended', 'Summary',
  'Trainer', 'Trainer Email', 'School', 'School ID', 'Created At', 'Updated At'
];

function createSessionsSheet() {
  const ss = SpreadsheetApp.getActiveSpreadsheet();
  const sheet = ss.insertSheet(SHEET_NAME);

  sheet.getRange(1, 1, 1, HEADERS.length).setValues([HEADERS]);
  sheet.getRange(1, 1, 1, HEADERS.length).setFontWeight('bold');

  return sheet;
}

function parseCsv_(text) {
  const rows = [];
  let row = [];
  let field = '';
  let inQuotes = false;

  for (let i = 0; i < text.length; i++) {
    const ch = text[i];
    if (inQuotes) {
      if (ch === '"' && text[i + 1] === '"') {
        field += '"';
        i++;
      } else if (ch === '"') {
        inQuotes = false;
      } else {
        field += ch;
      }
    } else if (ch === '"') {
      inQuotes = true;
    } else if (ch === ',') {
      row.push(field);
      field = '';
    } else if (ch === '\n') {
      row.push(field);
      rows.push(row);
      row = [];
      field = '';
    } else if (ch !== '\r') {
      field += ch;
    }
  }

  if (field !== '' || row.length > 0) {
    row.push(field);
    rows.push(row);
  }

  return rows;
}

function importSessionData() {
  const csvData = `__FIELDLOG_CSV_DATA__`;
  const ss = SpreadsheetApp.getActiveSpreadsheet();
  const sheet = ss.getSheetByName(SHEET_NAME) || createSessionsSheet();

  const data = parseCsv_(csvData).slice(1); // Skip header

  if (data.length > 0) {
    sheet.getRange(2, 1, data.length, HEADERS.length).setValues(data);
  }

  return 'Imported ' + data.length + ' sessions';
}

function getSessionsBySchool(schoolName) {
  const sheet = SpreadsheetApp.getActiveSpreadsheet().getSheetByName(SHEET_NAME);
  if (!sheet) return [];

  const data = sheet.getDataRange().getValues();
  const headers = data[0];
  const schoolIndex = headers.indexOf('School');
  const rows = data.slice(1);

  if (!schoolName || schoolName === 'All') return rows;
  return rows.filter(row => row[schoolIndex] === schoolName);
}

function getAnalytics() {
  const sheet = SpreadsheetApp.getActiveSpreadsheet().getSheetByName(SHEET_NAME);
  if (!sheet) return {};

  const data = sheet.getDataRange().getValues();
  const headers = data[0];
  const sessions = data.slice(1);

  const totalSessions = sessions.length;
  const boysIndex = headers.indexOf('Boys Attendance');
  const girlsIndex = headers.indexOf('Girls Attendance');

  const count = value => Math.max(parseInt(value, 10) || 0, 0);
  const totalAttendance = sessions.reduce((sum, row) => {
    return sum + count(row[boysIndex]) + count(row[girlsIndex]);
  }, 0);

  return {
    totalSessions,
    totalAttendance,
    averageAttendance: totalSessions > 0 ? Math.round(totalAttendance / totalSessions) : 0
  };
}

// Web app entry point serving the dashboard page
function doGet() {
  return HtmlService.createHtmlOutputFromFile('dashboard')
    .setTitle('School Session Dashboard')
    .setXFrameOptionsMode(HtmlService.XFrameOptionsMode.ALLOWALL);
}
"#;

pub const DASHBOARD_MARKUP: &str = r#"
<!DOCTYPE html>
<html>
<head>
  <title>School Session Dashboard</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 20px; }
    .container { max-width: 1200px; margin: 0 auto; }
    .stats { display: flex; gap: 20px; margin-bottom: 30px; }
    .stat-card { background: #f5f5f5; padding: 20px; border-radius: 8px; flex: 1; }
    .stat-number { font-size: 2em; font-weight: bold; color: #2563eb; }
    table { width: 100%; border-collapse: collapse; margin-top: 20px; }
    th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
    th { background-color: #f8f9fa; font-weight: bold; }
    tr:nth-child(even) { background-color: #f9f9f9; }
    .btn { background: #2563eb; color: white; padding: 10px 20px; border: none; border-radius: 4px; cursor: pointer; }
    .btn:hover { background: #1d4ed8; }
  </style>
</head>
<body>
  <div class="container">
    <h1>School Session Dashboard</h1>

    <div class="stats">
      <div class="stat-card">
        <div class="stat-number" id="totalSessions">0</div>
        <div>Total Sessions</div>
      </div>
      <div class="stat-card">
        <div class="stat-number" id="totalAttendance">0</div>
        <div>Total Attendance</div>
      </div>
      <div class="stat-card">
        <div class="stat-number" id="averageAttendance">0</div>
        <div>Average per Session</div>
      </div>
    </div>

    <button class="btn" onclick="loadData()">Refresh Data</button>

    <table id="sessionsTable">
      <thead>
        <tr>
          <th>Date</th>
          <th>Time</th>
          <th>Grade</th>
          <th>Attendance</th>
          <th>Teacher</th>
          <th>Topics</th>
        </tr>
      </thead>
      <tbody>
      </tbody>
    </table>
  </div>

  <script>
    function loadData() {
      google.script.run
        .withSuccessHandler(updateDashboard)
        .withFailureHandler(handleError)
        .getAnalytics();

      google.script.run
        .withSuccessHandler(updateTable)
        .withFailureHandler(handleError)
        .getSessionsBySchool('All');
    }

    function updateDashboard(analytics) {
      document.getElementById('totalSessions').textContent = analytics.totalSessions || 0;
      document.getElementById('totalAttendance').textContent = analytics.totalAttendance || 0;
      document.getElementById('averageAttendance').textContent = analytics.averageAttendance || 0;
    }

    function cell(row, value) {
      const td = row.insertCell();
      td.textContent = value;
    }

    function updateTable(sessions) {
      const tbody = document.querySelector('#sessionsTable tbody');
      tbody.innerHTML = '';

      sessions.forEach(session => {
        const row = tbody.insertRow();
        const count = value => Math.max(parseInt(value, 10) || 0, 0);
        const attendance = count(session[5]) + count(session[6]);

        cell(row, session[1]);
        cell(row, session[2]);
        cell(row, session[4]);
        cell(row, attendance);
        cell(row, session[8]);
        cell(row, session[7]);
      });
    }

    function handleError(error) {
      console.error('Error:', error);
      alert('Error loading data: ' + error);
    }

    window.onload = loadData;
  </script>
</body>
</html>
"#;

/// Escape text so it reads back verbatim inside a JavaScript template
/// literal: backslashes, backticks and `${` are escaped, and carriage
/// returns are written as `\r` since a literal normalizes raw CR and CRLF
/// to LF.
pub fn embed_in_template_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '\r' => out.push_str("\\r"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(ch),
        }
    }

    out
}

/// Spreadsheet script with `csv_text` embedded as its import payload
pub fn generate_remote_script(csv_text: &str) -> String {
    REMOTE_SCRIPT_TEMPLATE.replacen(CSV_PLACEHOLDER, &embed_in_template_literal(csv_text), 1)
}

/// Serialize records and embed them in the spreadsheet script
pub fn generate_remote_script_for(records: &[SessionRecord]) -> String {
    generate_remote_script(&to_csv(records))
}

/// Dashboard page; carries no session data of its own
pub fn generate_dashboard_markup() -> String {
    DASHBOARD_MARKUP.to_string()
}
