//! Page rendering: dropping the packaged records into the HTML template.

use tracing::debug;

use crate::config::PackConfig;
use crate::error::Result;
use crate::escape::escape_html;
use crate::package::{Package, read_utf8};

/// Where the combined records go. Only the first occurrence is replaced.
pub const PLACEHOLDER: &str = "{js_array_content}";

/// Replaced (everywhere) with the HTML-escaped page title.
pub const TITLE_TOKEN: &str = "{title}";

/// Substitute `combined` for the first [`PLACEHOLDER`] in `template`.
///
/// This is a plain text replacement; the template is not parsed or checked.
/// A template without the placeholder comes back unchanged.
pub fn render(combined: &str, template: &str) -> String {
    template.replacen(PLACEHOLDER, combined, 1)
}

/// Render the full installer page for `package`.
///
/// Uses the template file from `config.template` when set, otherwise
/// [`DEFAULT_TEMPLATE`].
pub fn render_installer(package: &Package, config: &PackConfig) -> Result<String> {
    let template = match &config.template {
        Some(path) => {
            debug!(template = %path.display(), "using custom template");
            read_utf8(path)?
        }
        None => DEFAULT_TEMPLATE.to_string(),
    };

    // Braces are encoded so a title can never spell the placeholder.
    let title = escape_html(&config.title).replace('{', "&#123;");
    let template = template.replace(TITLE_TOKEN, &title);

    let page = render(&package.combined, &template);
    debug!(files = package.len(), bytes = page.len(), "rendered page");
    Ok(page)
}

/// Built-in installer page.
///
/// Self-contained (no external stylesheets, fonts or scripts) so it works on
/// a machine with no network at all.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {
            font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
            background-color: #f7f7f7;
            color: #1f2937;
            margin: 0;
            padding: 2rem 1rem;
            min-height: 100vh;
        }
        .container {
            max-width: 900px;
            margin: 0 auto;
        }
        header {
            text-align: center;
            margin-bottom: 2rem;
        }
        header p {
            color: #4b5563;
        }
        .card {
            background-color: white;
            padding: 1.5rem;
            border-radius: 0.75rem;
            box-shadow: 0 4px 12px rgba(0, 0, 0, 0.08);
            margin-bottom: 2rem;
        }
        .card li {
            margin-bottom: 0.5rem;
        }
        .status {
            padding: 1rem;
            border-radius: 0.5rem;
            margin-bottom: 1.5rem;
            border: 1px solid;
        }
        .status.ok {
            background-color: #dcfce7;
            border-color: #86efac;
            color: #166534;
        }
        .status.error {
            background-color: #fee2e2;
            border-color: #fca5a5;
            color: #991b1b;
        }
        .file-block {
            background-color: #1f2937;
            color: #d1d5db;
            border-radius: 0.5rem;
            overflow: hidden;
            margin-bottom: 1.5rem;
            box-shadow: 0 8px 20px rgba(0, 0, 0, 0.15);
        }
        .file-header {
            background-color: #4b5563;
            color: white;
            padding: 0.75rem 1rem;
            font-weight: 600;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        .code-area {
            margin: 0;
            padding: 1rem;
            white-space: pre-wrap;
            word-wrap: break-word;
            font-family: ui-monospace, Menlo, Consolas, monospace;
            font-size: 0.875rem;
            line-height: 1.4;
        }
        .copy-btn {
            padding: 0.5rem 1rem;
            border: none;
            border-radius: 0.375rem;
            background-color: #3b82f6;
            color: white;
            font-weight: 600;
            cursor: pointer;
            transition: background-color 0.15s;
        }
        .copy-btn:hover {
            background-color: #2563eb;
        }
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>{title}</h1>
            <p>Use this page on the offline machine to re-create the files below.</p>
        </header>

        <div id="status" class="status" hidden></div>

        <section class="card">
            <h2>Rebuilding Instructions</h2>
            <ol>
                <li>On the offline machine, open this <strong>HTML file in any browser</strong>.</li>
                <li>For each file block below, click the <strong>Copy</strong> button.</li>
                <li>Create a new project folder (e.g. <code>my-extension</code>).</li>
                <li>Inside it, create each file under the name shown (e.g. <code>package.json</code>) and <strong>paste the content</strong>.</li>
                <li>Once all files exist, open the folder in VS Code and launch it from the <strong>Run and Debug</strong> view.</li>
            </ol>
        </section>

        <div id="files-container"></div>
    </div>

    <script>
        const extensionFiles = [
{js_array_content}
        ];

        const container = document.getElementById('files-container');
        const statusBox = document.getElementById('status');

        function escapeHtml(text) {
            return text.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
        }

        function showStatus(message, isError = false) {
            statusBox.textContent = message;
            statusBox.className = isError ? 'status error' : 'status ok';
            statusBox.hidden = false;
            setTimeout(() => {
                statusBox.hidden = true;
            }, 3000);
        }

        function fallbackCopy(text) {
            const textarea = document.createElement('textarea');
            textarea.value = text;
            textarea.style.position = 'fixed';
            textarea.style.left = '-9999px';
            document.body.appendChild(textarea);
            textarea.select();
            const copied = document.execCommand('copy');
            document.body.removeChild(textarea);
            if (!copied) {
                throw new Error('copy command was rejected');
            }
        }

        async function copyToClipboard(name, text) {
            try {
                if (navigator.clipboard && window.isSecureContext) {
                    await navigator.clipboard.writeText(text);
                } else {
                    fallbackCopy(text);
                }
                showStatus(`Copied ${name} to clipboard.`);
            } catch (err) {
                showStatus('Error copying text. Please select and copy manually.', true);
                console.error('Copy error:', err);
            }
        }

        extensionFiles.forEach((file, index) => {
            const block = document.createElement('div');
            block.className = 'file-block';
            block.innerHTML = `
                <div class="file-header">
                    <span>${escapeHtml(file.name)}</span>
                    <button class="copy-btn" data-index="${index}">Copy</button>
                </div>
                <pre class="code-area">${escapeHtml(file.content.trim())}</pre>
            `;
            container.appendChild(block);
        });

        container.addEventListener('click', (e) => {
            const button = e.target.closest('.copy-btn');
            if (!button) {
                return;
            }
            const file = extensionFiles[Number(button.dataset.index)];
            copyToClipboard(file.name, file.content.trim());
        });
    </script>
</body>
</html>
"#;
