//! HTML views: the note editor and the password prompt.
//!
//! Templates are plain constants with `{{KEY}}` placeholders, filled in a
//! single pass so that substituted text is never scanned for further
//! placeholders. Every substituted value is HTML-escaped by the caller.

use notekv_core::escape::escape;
use notekv_core::name::NoteName;

/// Fill `{{KEY}}` placeholders in one left-to-right pass.
///
/// Unknown placeholders are left as they are.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len().saturating_add(1024));
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start.saturating_add(2)..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start.saturating_add(end).saturating_add(4)]),
        }
        rest = &after[end.saturating_add(2)..];
    }
    out.push_str(rest);
    out
}

/// Render the editor page for `name` showing `content`.
#[must_use]
pub fn render_editor(name: &NoteName, content: &str, protected: bool) -> String {
    let title = escape(name.as_str());
    let body = escape(content);
    let (status, action) = if protected {
        ("Password set", "updatePassword")
    } else {
        ("Not set", "setPassword")
    };
    fill(
        EDITOR_HTML,
        &[
            ("NAME", title.as_str()),
            ("CONTENT", body.as_str()),
            ("PASSWORD_STATUS", status),
            ("PASSWORD_ACTION", action),
        ],
    )
}

/// Render the password prompt for `name`. Discloses nothing but the name.
#[must_use]
pub fn render_prompt(name: &NoteName) -> String {
    let title = escape(name.as_str());
    fill(PROMPT_HTML, &[("NAME", title.as_str())])
}

/// Editor page. The password link posts `setPassword` or `updatePassword`;
/// an empty answer to the update prompt removes the password.
const EDITOR_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Notebook: {{NAME}}</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 20px; }
    #editor { width: 100%; height: 80vh; margin-bottom: 10px; }
    #buttons { margin-bottom: 10px; }
    #save-status { margin-left: 10px; font-weight: bold; }
    #password-status { margin-bottom: 10px; }
  </style>
</head>
<body>
  <h1>Notebook: {{NAME}}</h1>
  <div id="password-status">
    <label>Password: </label>
    <a href="#" id="password-link">{{PASSWORD_STATUS}}</a>
  </div>
  <div id="buttons">
    <button onclick="copyText()">Copy</button>
    <button onclick="saveText()">Save</button>
    <button onclick="clearText()">Clear</button>
    <span id="save-status"></span>
  </div>
  <textarea id="editor">{{CONTENT}}</textarea>

  <script>
    const passwordAction = '{{PASSWORD_ACTION}}';

    document.getElementById('password-link').onclick = async function (e) {
      e.preventDefault();
      const question = passwordAction === 'updatePassword'
        ? 'Enter new password (leave empty to remove it):'
        : 'Enter new password:';
      const password = prompt(question);
      if (password === null) return;
      if (password === '' && passwordAction === 'setPassword') return;

      const response = await fetch(window.location.pathname, {
        method: 'POST',
        body: new URLSearchParams({ action: passwordAction, newPassword: password })
      });
      if (response.ok) {
        alert('Password updated successfully');
        window.location.href = window.location.pathname;
      } else {
        alert('Password update failed');
      }
    };

    function copyText() {
      const editor = document.getElementById('editor');
      editor.select();
      if (navigator.clipboard) {
        navigator.clipboard.writeText(editor.value);
      } else {
        document.execCommand('copy');
      }
    }

    function clearText() {
      document.getElementById('editor').value = '';
    }

    async function saveText() {
      const content = document.getElementById('editor').value;
      const status = document.getElementById('save-status');

      // Timestamp defeats caches between the browser and the server.
      const url = new URL(window.location.pathname, window.location.origin);
      url.searchParams.set('t', Date.now());

      try {
        const response = await fetch(url, {
          method: 'POST',
          body: new URLSearchParams({ content })
        });
        status.textContent = response.ok
          ? 'Saved at: ' + new Date().toLocaleTimeString()
          : 'Save failed';
      } catch (err) {
        status.textContent = 'Save failed';
      }
    }
  </script>
</body>
</html>
"##;

/// Password prompt. The password is sent back as `q`, base64 of its UTF-8
/// bytes with the `=` padding removed.
const PROMPT_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Notebook: {{NAME}}</title>
</head>
<body>
  <h1>Notebook: {{NAME}}</h1>
  <form id="unlock" method="GET">
    <label for="password">Password:</label>
    <input type="password" id="password" required autofocus>
    <button type="submit">Submit</button>
  </form>
  <script>
    function encodeCredential(password) {
      const bytes = new TextEncoder().encode(password);
      let binary = '';
      bytes.forEach(function (b) { binary += String.fromCharCode(b); });
      return btoa(binary).replace(/=+$/, '');
    }

    document.getElementById('unlock').onsubmit = function (e) {
      e.preventDefault();
      const password = document.getElementById('password').value;
      const url = new URL(window.location.pathname, window.location.origin);
      url.searchParams.set('q', encodeCredential(password));
      window.location.href = url.toString();
    };
  </script>
</body>
</html>
"##;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn name(n: &str) -> NoteName {
        NoteName::new(n).unwrap()
    }

    #[test]
    fn fill_substitutes_known_keys() {
        assert_eq!(fill("a {{X}} b {{Y}}", &[("X", "1"), ("Y", "2")]), "a 1 b 2");
    }

    #[test]
    fn fill_does_not_rescan_values() {
        assert_eq!(
            fill("{{A}}|{{B}}", &[("A", "{{B}}"), ("B", "two")]),
            "{{B}}|two"
        );
    }

    #[test]
    fn fill_keeps_unknown_and_unterminated() {
        assert_eq!(fill("x {{NOPE}} y", &[]), "x {{NOPE}} y");
        assert_eq!(fill("x {{open", &[("open", "z")]), "x {{open");
    }

    #[test]
    fn editor_escapes_content_and_name() {
        let html = render_editor(&name("<b>"), "</textarea><script>alert(1)</script>", false);
        assert!(html.contains("<title>Notebook: &lt;b&gt;</title>"));
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn editor_shows_password_state() {
        let open = render_editor(&name("foo"), "", false);
        assert!(open.contains(">Not set</a>"));
        assert!(open.contains("const passwordAction = 'setPassword';"));

        let locked = render_editor(&name("foo"), "", true);
        assert!(locked.contains(">Password set</a>"));
        assert!(locked.contains("const passwordAction = 'updatePassword';"));
    }

    #[test]
    fn prompt_has_no_textarea() {
        let html = render_prompt(&name("foo"));
        assert!(html.contains("Notebook: foo"));
        assert!(html.contains("type=\"password\""));
        assert!(!html.contains("<textarea"));
    }
}
