use crate::catalog::{CatalogSummary, ServiceRecord};
use crate::cli_config::Config;

// =============================================================================
// HTML Dashboard Renderer
// =============================================================================

const TITLE: &str = "Container Services Dashboard";

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            padding: 20px;
        }
        .container { max-width: 1400px; margin: 0 auto; }
        .header {
            background: linear-gradient(135deg, #2c3e50 0%, #34495e 100%);
            color: white;
            padding: 30px;
            text-align: center;
            border-radius: 15px;
        }
        .header-top { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 30px; }
        .header-content { flex: 1; }
        .header h1 { font-size: 2.5em; margin-bottom: 10px; font-weight: 300; }
        .header p { font-size: 1.1em; opacity: 0.9; }
        .protocol-toggle { margin-top: 10px; }
        .toggle-btn {
            background: rgba(255, 255, 255, 0.2);
            border: 1px solid rgba(255, 255, 255, 0.3);
            border-radius: 20px;
            padding: 8px 16px;
            font-size: 0.85em;
            font-weight: 500;
            color: white;
            cursor: pointer;
            transition: all 0.3s ease;
            outline: none;
        }
        .toggle-btn:hover { background: rgba(255, 255, 255, 0.3); border-color: rgba(255, 255, 255, 0.5); }
        .toggle-btn.active { background: #3498db; border-color: #2980b9; }
        .stats { display: flex; justify-content: center; gap: 30px; margin-top: 20px; }
        .stat { text-align: center; }
        .stat-number { font-size: 2.5em; font-weight: 700; color: #3498db; margin-bottom: 5px; }
        .stat-label { font-size: 1em; opacity: 0.8; text-transform: uppercase; letter-spacing: 1px; }
        .content {
            background: white;
            border-radius: 15px;
            padding: 30px;
            box-shadow: 0 10px 30px rgba(0, 0, 0, 0.1);
            margin-top: 20px;
        }
        .status-tabs { display: flex; gap: 10px; margin-bottom: 30px; justify-content: center; }
        .status-tab {
            padding: 12px 24px;
            border: 2px solid #3498db;
            background: transparent;
            color: #3498db;
            border-radius: 25px;
            cursor: pointer;
            transition: all 0.3s ease;
            font-weight: 600;
            font-size: 1em;
        }
        .status-tab:hover { background: #2980b9; color: white; }
        .status-tab.active { background: #3498db; color: white; }
        .services-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(350px, 1fr)); gap: 20px; }
        .service-card {
            background: white;
            border-radius: 12px;
            padding: 16px;
            box-shadow: 0 3px 10px rgba(0, 0, 0, 0.08);
            border: 1px solid #e1e8ed;
            transition: all 0.3s ease;
            position: relative;
            overflow: hidden;
            text-decoration: none;
            color: inherit;
            display: block;
        }
        .service-card:hover { transform: translateY(-5px); box-shadow: 0 15px 30px rgba(0, 0, 0, 0.15); }
        .service-card::before {
            content: '';
            position: absolute;
            top: 0; left: 0; right: 0;
            height: 4px;
            background: linear-gradient(90deg, #3498db, #2ecc71);
        }
        .service-name { font-size: 1.3em; font-weight: 600; color: #2c3e50; margin-bottom: 6px; }
        .service-image { font-size: 0.9em; color: #7f8c8d; margin-bottom: 10px; font-family: 'Courier New', monospace; }
        .service-info { display: flex; justify-content: space-between; align-items: baseline; margin-top: 8px; }
        .service-port { font-size: 0.8em; color: #2c3e50; font-weight: 600; }
        .service-status { display: inline-block; padding: 3px 10px; border-radius: 16px; font-size: 0.8em; font-weight: 600; }
        .status-running { background: #d5f4e6; color: #27ae60; }
        .status-unhealthy { background: #fef9e7; color: #f39c12; }
        .status-stopped { background: #fadbd8; color: #e74c3c; }
        .footer { text-align: center; margin-top: 40px; padding: 20px; color: #ecf0f1; font-size: 0.9em; }
        .footer p { margin-bottom: 5px; }
        .no-services { text-align: center; padding: 60px 20px; color: #7f8c8d; }
        .no-services h3 { font-size: 1.5em; margin-bottom: 15px; color: #95a5a6; }
        .no-services p { font-size: 1.1em; line-height: 1.6; margin-bottom: 10px; }
        @media (max-width: 768px) {
            .header { padding: 20px; }
            .header h1 { font-size: 2em; }
            .stats { flex-direction: column; gap: 15px; }
            .services-grid { grid-template-columns: 1fr; }
            .status-tabs { flex-direction: column; align-items: center; }
            .status-tab { width: 100%; max-width: 200px; }
        }
"#;

/// Tab filtering and the http/https link toggle both run in the browser.
const SCRIPT: &str = r#"
        function showServices(type, button) {
            document.querySelectorAll('.status-tab').forEach(tab => tab.classList.remove('active'));
            button.classList.add('active');

            document.querySelectorAll('.service-card').forEach(card => {
                const isRunning = card.querySelector('.status-running');
                const isStopped = card.querySelector('.status-stopped');
                const visible = type === 'all'
                    || (type === 'running' && isRunning)
                    || (type === 'stopped' && isStopped);
                card.style.display = visible ? 'block' : 'none';
            });
        }

        function toggleProtocol() {
            const btn = document.getElementById('protocol-btn');
            const text = document.getElementById('protocol-text');
            const toHttps = text.textContent === 'HTTP';
            const from = toHttps ? 'http://' : 'https://';
            const to = toHttps ? 'https://' : 'http://';

            text.textContent = toHttps ? 'HTTPS' : 'HTTP';
            btn.classList.toggle('active', toHttps);

            document.querySelectorAll('.service-card').forEach(card => {
                const href = card.getAttribute('href');
                if (href && href.startsWith(from + window.location.hostname + ':')) {
                    card.setAttribute('href', href.replace(from, to));
                }
            });
        }
"#;

/// Minimal escaping for text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Links always use `http://`; `config.protocol` does not change them.
fn service_url(service: &ServiceRecord, config: &Config) -> String {
    match service.primary_port() {
        Some(port) => format!("http://{}:{}", config.hostname, port),
        None => "#".to_string(),
    }
}

fn render_card(html: &mut String, service: &ServiceRecord, config: &Config) {
    let port = service.primary_port().unwrap_or("-");
    html.push_str(&format!(
        r#"
                <a href="{url}" target="_blank" class="service-card" data-category="{category}">
                    <div class="service-name">{name}</div>
                    <div class="service-image">{image}</div>
                    <div class="service-info">
                        <span class="service-port">Port: {port}</span>
                        <div class="service-status {class}">{status}</div>
                    </div>
                </a>"#,
        url = escape_html(&service_url(service, config)),
        name = escape_html(&service.display_name),
        image = escape_html(&service.image),
        port = escape_html(port),
        class = service.state().css_class(),
        category = escape_html(&service.category),
        status = escape_html(&service.status),
    ));
}

/// Renders the whole self-contained page. `generated_at` goes in the footer
/// and is the only input not derived from the catalog and config.
pub fn render_dashboard(services: &[ServiceRecord], config: &Config, generated_at: &str) -> String {
    let summary = CatalogSummary::of(services);
    let mut html = String::with_capacity(16 * 1024);

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{TITLE}</title>
    <style>{STYLE}    </style>
    <script>{SCRIPT}    </script>
</head>
<body>
    <div class="container">
        <div class="header">
            <div class="header-top">
                <div class="header-content">
                    <h1>🐳 {TITLE}</h1>
                    <p>Manage and access your containerized services</p>
                </div>
                <div class="protocol-toggle">
                    <button id="protocol-btn" onclick="toggleProtocol()" class="toggle-btn">
                        <span id="protocol-text">HTTP</span>
                    </button>
                </div>
            </div>
            <div class="stats">
                <div class="stat">
                    <div class="stat-number">{running}</div>
                    <div class="stat-label">Running</div>
                </div>
                <div class="stat">
                    <div class="stat-number">{stopped}</div>
                    <div class="stat-label">Stopped</div>
                </div>
                <div class="stat">
                    <div class="stat-number">{total}</div>
                    <div class="stat-label">Total Services</div>
                </div>
            </div>
        </div>

        <div class="content">
            <div class="status-tabs">
                <button class="status-tab active" onclick="showServices('all', this)">All Services ({total})</button>
                <button class="status-tab" onclick="showServices('running', this)">Running ({running})</button>
                <button class="status-tab" onclick="showServices('stopped', this)">Stopped ({stopped})</button>
            </div>"#,
        running = summary.running,
        stopped = summary.stopped,
        total = summary.total,
    ));

    if services.is_empty() {
        html.push_str(
            r#"
            <div class="no-services">
                <h3>No Services Found</h3>
                <p>No containers with external ports are currently available.</p>
                <p>Note: Database containers and containers without external ports are filtered out.</p>
            </div>"#,
        );
    } else {
        html.push_str(
            r#"
            <div class="services-grid">"#,
        );
        for service in services {
            render_card(&mut html, service, config);
        }
        html.push_str(
            r#"
            </div>"#,
        );
    }

    html.push_str(&format!(
        r#"
        </div>

        <div class="footer">
            <p>Last updated: {generated_at}</p>
            <p>Generated by rusty-portboard</p>
        </div>
    </div>
</body>
</html>
"#,
        generated_at = escape_html(generated_at),
    ));

    html
}
