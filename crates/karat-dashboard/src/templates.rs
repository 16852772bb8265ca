//! HTML templates for the dashboard.
//!
//! Uses a simple template approach with Tailwind CSS. Every value that came
//! from the API or the user goes through [`html_escape`] before it is placed
//! in markup.

use karat_core::User;

const HEAD: &str = r##"<meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {
            theme: {
                extend: {
                    colors: {
                        primary: {
                            50: '#fdf8ec',
                            100: '#f9ecc9',
                            500: '#c9962b',
                            600: '#b07f1f',
                            700: '#8c631a',
                            900: '#4a340f',
                        }
                    }
                }
            }
        }
    </script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">"##;

/// Base HTML layout wrapper with the role-dependent navigation bar.
pub fn layout(title: &str, user: Option<&User>, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    {HEAD}
    <title>{title} - Karat</title>
</head>
<body class="bg-gray-50 min-h-screen">
    {nav}
    <main class="p-6 lg:p-8">
        <div class="max-w-7xl mx-auto">
            {content}
        </div>
    </main>
</body>
</html>"##,
        title = html_escape(title),
        nav = nav_template(user),
    )
}

/// Page shown for errors that have no page of their own.
pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        None,
        &empty_state(
            "exclamation-triangle",
            "Something went wrong",
            message,
            Some(("Back to start", "/")),
        ),
    )
}

fn nav_template(user: Option<&User>) -> String {
    let Some(user) = user else {
        return r##"<nav class="bg-primary-700 text-white px-4 py-3 shadow-lg">
        <a href="/" class="font-semibold"><i class="fas fa-gem"></i> Karat</a>
    </nav>"##
            .to_string();
    };

    let links: &[(&str, &str)] = if user.role.is_owner() {
        &[
            ("/dashboard", "Dashboard"),
            ("/jobs", "Jobs"),
            ("/users", "Users"),
            ("/reports", "Reports"),
        ]
    } else {
        &[("/worker/tasks", "My Tasks")]
    };
    let links_html: String = links
        .iter()
        .map(|(href, label)| {
            format!(r#"<a href="{href}" class="px-3 py-2 rounded-lg hover:bg-primary-600">{label}</a>"#)
        })
        .collect();

    format!(
        r##"<nav class="bg-primary-700 text-white px-4 py-3 sticky top-0 z-50 shadow-lg">
        <div class="flex items-center justify-between">
            <div class="flex items-center gap-4">
                <a href="/" class="font-semibold"><i class="fas fa-gem"></i> Karat</a>
                {links_html}
            </div>
            <div class="flex items-center gap-4 text-sm">
                <span>{name} ({role})</span>
                <form method="POST" action="/logout">
                    <button type="submit" class="px-3 py-1 bg-primary-900 hover:bg-primary-600 rounded-lg">Logout</button>
                </form>
            </div>
        </div>
    </nav>"##,
        name = html_escape(&user.full_name),
        role = html_escape(user.role.as_str()),
    )
}

/// Page heading with an optional action link on the right.
pub fn page_header(title: &str, action: Option<(&str, &str)>) -> String {
    let action_html = action.map_or(String::new(), |(text, href)| {
        format!(
            r##"<a href="{href}" class="inline-flex items-center gap-2 bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">
            <i class="fas fa-plus"></i> {text}
        </a>"##
        )
    });
    format!(
        r##"<div class="flex items-center justify-between mb-6">
            <h1 class="text-2xl font-bold text-gray-900">{title}</h1>
            {action_html}
        </div>"##,
        title = html_escape(title),
    )
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden mb-6">
            <div class="px-6 py-4 border-b border-gray-200">
                <h3 class="text-lg font-semibold text-gray-900">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##,
        title = html_escape(title),
    )
}

/// Stats card component.
pub fn stats_card(title: &str, value: &str, icon: &str, color: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500">{title}</p>
                    <p class="text-2xl font-bold text-gray-900 mt-1">{value}</p>
                </div>
                <div class="w-12 h-12 rounded-full bg-{color}-100 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500 text-xl"></i>
                </div>
            </div>
        </div>"##,
        value = html_escape(value),
    )
}

/// Red banner for a failed action or load.
pub fn alert(message: &str) -> String {
    format!(
        r##"<div class="mb-6 p-4 bg-red-50 border border-red-200 rounded-lg">
            <div class="flex items-center gap-3">
                <i class="fas fa-exclamation-circle text-red-500"></i>
                <span class="text-red-700">{message}</span>
            </div>
        </div>"##,
        message = html_escape(message),
    )
}

/// Banner for an optional error message.
pub fn alert_opt(message: Option<&str>) -> String {
    message.map(alert).unwrap_or_default()
}

/// Input field component.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, attrs: &str) -> String {
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <input type="{input_type}" name="{name}" id="{name}" value="{value}" {attrs}
                   class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
        </div>"##,
        value = html_escape(value),
    )
}

/// Multi-line text field component.
pub fn textarea(name: &str, label: &str, value: &str) -> String {
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <textarea name="{name}" id="{name}" rows="3"
                      class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-primary-500 focus:border-primary-500">{value}</textarea>
        </div>"##,
        value = html_escape(value),
    )
}

/// Select field component. Options are `(value, text, selected)`.
pub fn select(name: &str, label: &str, options: &[(String, String, bool)]) -> String {
    let options_html: String = options
        .iter()
        .map(|(value, text, selected)| {
            let value = html_escape(value);
            let text = html_escape(text);
            if *selected {
                format!(r#"<option value="{value}" selected>{text}</option>"#)
            } else {
                format!(r#"<option value="{value}">{text}</option>"#)
            }
        })
        .collect();

    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <select name="{name}" id="{name}" required
                    class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
                {options_html}
            </select>
        </div>"##
    )
}

/// Submit button with a secondary cancel link.
pub fn form_actions(submit: &str, cancel_href: &str) -> String {
    format!(
        r##"<div class="flex gap-3 pt-2">
            <button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">{submit}</button>
            <a href="{cancel_href}" class="bg-gray-200 hover:bg-gray-300 text-gray-700 px-4 py-2 rounded-lg font-medium">Cancel</a>
        </div>"##
    )
}

/// Badge component.
pub fn badge(text: &str, color: &str) -> String {
    format!(
        r##"<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-{color}-100 text-{color}-800">{text}</span>"##,
        text = html_escape(text),
    )
}

/// Table component. Cells are inserted as-is; escape them first.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let headers_html: String = headers
        .iter()
        .map(|h| format!(r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{h}</th>"#))
        .collect();

    let rows_html: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!(r#"<td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{cell}</td>"#))
                .collect();
            format!(r#"<tr class="hover:bg-gray-50">{cells}</tr>"#)
        })
        .collect();

    format!(
        r##"<div class="overflow-x-auto bg-white rounded-xl shadow-sm border border-gray-200">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>{headers_html}</tr>
                </thead>
                <tbody class="divide-y divide-gray-200">
                    {rows_html}
                </tbody>
            </table>
        </div>"##
    )
}

/// Empty state component.
pub fn empty_state(
    icon: &str,
    title: &str,
    description: &str,
    action: Option<(&str, &str)>,
) -> String {
    let action_html = action.map_or(String::new(), |(text, href)| {
        format!(r##"<a href="{href}" class="mt-4 inline-flex items-center gap-2 bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">{text}</a>"##)
    });

    format!(
        r##"<div class="text-center py-12 bg-white rounded-xl border border-gray-200">
            <i class="fas fa-{icon} text-4xl text-gray-400 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900">{title}</h3>
            <p class="mt-1 text-gray-500">{description}</p>
            {action_html}
        </div>"##,
        title = html_escape(title),
        description = html_escape(description),
    )
}

/// Escaped text, or `-` when there is none.
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => html_escape(v),
        _ => "-".to_string(),
    }
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use karat_core::Role;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "u".to_string(),
            email: String::new(),
            full_name: "Ana <B>".to_string(),
            role,
            is_active: true,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("a<b")), "a&lt;b");
    }

    #[test]
    fn test_owner_nav_links() {
        let html = layout("Jobs", Some(&user(Role::Owner)), "");
        for href in ["/dashboard", "/jobs", "/users", "/reports"] {
            assert!(html.contains(&format!(r#"href="{href}""#)), "missing {href}");
        }
        assert!(!html.contains("My Tasks"));
        assert!(html.contains("Ana &lt;B&gt; (owner)"));
    }

    #[test]
    fn test_worker_nav_links() {
        let html = layout("Tasks", Some(&user(Role::Caster)), "");
        assert!(html.contains("My Tasks"));
        assert!(!html.contains(r#"href="/reports""#));
        assert!(html.contains("(caster)"));
        assert!(html.contains(r#"action="/logout""#));
    }

    #[test]
    fn test_anonymous_nav_has_no_logout() {
        let html = layout("Login", None, "");
        assert!(!html.contains("/logout"));
    }
}
