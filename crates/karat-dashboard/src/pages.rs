//! Page templates for dashboard views.

use crate::handlers::{AssignForm, CompleteForm, JobForm, UserForm};
use crate::templates::{
    alert, alert_opt, badge, card, empty_state, form_actions, html_escape, input, layout, or_dash,
    page_header, select, stats_card, table, textarea,
};
use karat_core::model::{display_date, grams, percent};
use karat_core::{
    Job, JobDetail, JobStatus, JobSummary, ReportsOverview, Role, Stage, User, WorkerTask,
};

const WEIGHT_ATTRS: &str = r#"required step="0.001" min="0""#;

fn status_badge(status: &str) -> String {
    let color = match status {
        "completed" => "green",
        "in_progress" => "blue",
        "pending_assignment" => "yellow",
        _ => "gray",
    };
    badge(status, color)
}

fn role_badge(role: &Role) -> String {
    badge(role.as_str(), if role.is_owner() { "red" } else { "cyan" })
}

fn opt_grams(value: Option<f64>) -> String {
    value.map(grams).unwrap_or_else(|| "-".to_string())
}

fn opt_percent(value: Option<f64>) -> String {
    value.map(percent).unwrap_or_else(|| "-".to_string())
}

fn form(action: &str, fields: &str) -> String {
    format!(r##"<form method="POST" action="{action}" class="space-y-4 max-w-xl">{fields}</form>"##)
}

// =============================================================================
// Dashboard
// =============================================================================

pub fn dashboard_page(user: &User, summary: Result<&JobSummary, &str>) -> String {
    let body = match summary {
        Ok(summary) => format!(
            r##"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6 mb-6">
            {total}
            {completed}
            {in_progress}
            {pending}
        </div>
        <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
            {weight}
            {loss}
            {avg}
        </div>"##,
            total = stats_card(
                "Total Jobs",
                &summary.total_jobs.to_string(),
                "briefcase",
                "blue"
            ),
            completed = stats_card(
                "Completed",
                &summary.completed_jobs.to_string(),
                "check",
                "green"
            ),
            in_progress = stats_card(
                "In Progress",
                &summary.in_progress_jobs.to_string(),
                "spinner",
                "yellow"
            ),
            pending = stats_card("Pending", &summary.pending_jobs.to_string(), "clock", "gray"),
            weight = stats_card(
                "Total Initial Weight",
                &grams(summary.total_initial_weight),
                "weight-hanging",
                "purple"
            ),
            loss = stats_card("Total Loss", &grams(summary.total_loss), "arrow-down", "red"),
            avg = stats_card(
                "Avg Loss %",
                &percent(summary.average_loss_percentage),
                "percent",
                "orange"
            ),
        ),
        Err(message) => alert(message),
    };

    layout(
        "Dashboard",
        Some(user),
        &format!("{}{body}", page_header("Dashboard", None)),
    )
}

// =============================================================================
// Jobs
// =============================================================================

pub fn jobs_page(user: &User, filter: Option<JobStatus>, jobs: Result<&[Job], &str>) -> String {
    let mut filter_links = vec![filter_link("All", "/jobs", filter.is_none())];
    for status in JobStatus::ALL {
        filter_links.push(filter_link(
            status.label(),
            &format!("/jobs?status={}", urlencoding::encode(status.as_str())),
            filter == Some(status),
        ));
    }
    let filters = format!(
        r##"<div class="flex items-center gap-2 mb-4 text-sm">
            <span class="text-gray-600">Filter by status:</span>
            {links}
        </div>"##,
        links = filter_links.join(""),
    );

    let body = match jobs {
        Err(message) => alert(message),
        Ok([]) => empty_state(
            "briefcase",
            "No jobs",
            "No jobs match this filter.",
            Some(("Create Job", "/jobs/new")),
        ),
        Ok(jobs) => {
            let rows: Vec<Vec<String>> = jobs
                .iter()
                .map(|job| {
                    vec![
                        job.id.to_string(),
                        html_escape(&job.design_no),
                        html_escape(&job.item_category),
                        grams(job.initial_weight),
                        grams(job.total_loss),
                        percent(job.loss_percentage),
                        status_badge(&job.status),
                        format!(
                            r#"<a href="/jobs/{id}" class="text-primary-600 hover:underline mr-3">View</a><a href="/jobs/{id}/assign" class="text-primary-600 hover:underline">Assign</a>"#,
                            id = job.id
                        ),
                    ]
                })
                .collect();
            table(
                &[
                    "ID",
                    "Design No",
                    "Category",
                    "Initial Weight",
                    "Total Loss",
                    "Loss %",
                    "Status",
                    "Actions",
                ],
                &rows,
            )
        }
    };

    layout(
        "Jobs",
        Some(user),
        &format!(
            "{}{filters}{body}",
            page_header("Jobs", Some(("Create Job", "/jobs/new")))
        ),
    )
}

fn filter_link(label: &str, href: &str, active: bool) -> String {
    let class = if active {
        "bg-primary-600 text-white"
    } else {
        "bg-white text-gray-700 border border-gray-300 hover:bg-gray-100"
    };
    format!(r#"<a href="{href}" class="px-3 py-1 rounded-full {class}">{label}</a>"#)
}

pub fn job_form_page(user: &User, values: &JobForm, error: Option<&str>) -> String {
    let fields = [
        input("design_no", "Design No", "text", &values.design_no, "required"),
        input(
            "item_category",
            "Item Category",
            "text",
            &values.item_category,
            "required placeholder=\"ring, necklace, bracelet\"",
        ),
        input(
            "initial_weight",
            "Initial Weight (g)",
            "number",
            &values.initial_weight,
            WEIGHT_ATTRS,
        ),
        textarea("description", "Description", &values.description),
        form_actions("Create Job", "/jobs"),
    ]
    .concat();

    layout(
        "Create Job",
        Some(user),
        &format!(
            "{}{}{}",
            page_header("Create New Job", None),
            alert_opt(error),
            card("Job", &form("/jobs", &fields)),
        ),
    )
}

pub fn job_detail_page(user: &User, detail: &JobDetail) -> String {
    let job = &detail.job;
    let facts = [
        ("Category", html_escape(&job.item_category)),
        ("Initial Weight", grams(job.initial_weight)),
        ("Total Loss", grams(job.total_loss)),
        ("Loss Percentage", percent(job.loss_percentage)),
        ("Status", status_badge(&job.status)),
        ("Current Stage", or_dash(job.current_stage.as_deref())),
        ("Created", display_date(&job.created_at)),
        ("Description", or_dash(job.description.as_deref())),
    ];
    let facts_html: String = facts
        .iter()
        .map(|(label, value)| {
            format!(r#"<div><dt class="text-sm text-gray-500">{label}</dt><dd class="text-gray-900">{value}</dd></div>"#)
        })
        .collect();

    let history = if detail.transactions.is_empty() {
        empty_state("history", "No transactions", "This job has not been assigned yet.", None)
    } else {
        let rows: Vec<Vec<String>> = detail
            .transactions
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    html_escape(&t.stage),
                    t.worker_id.to_string(),
                    grams(t.issued_weight),
                    opt_grams(t.returned_weight),
                    opt_grams(t.loss),
                    opt_percent(t.loss_percentage),
                    badge(&t.status, if t.status == "completed" { "green" } else { "yellow" }),
                    display_date(&t.issued_at),
                    or_dash(t.notes.as_deref()),
                ]
            })
            .collect();
        table(
            &[
                "ID",
                "Stage",
                "Worker",
                "Issued",
                "Returned",
                "Loss",
                "Loss %",
                "Status",
                "Issued At",
                "Notes",
            ],
            &rows,
        )
    };

    layout(
        &job.design_no,
        Some(user),
        &format!(
            "{}{}{}",
            page_header(
                &format!("Job {}", job.design_no),
                Some(("Assign", &format!("/jobs/{}/assign", job.id))),
            ),
            card(
                "Details",
                &format!(r#"<dl class="grid grid-cols-2 md:grid-cols-4 gap-4">{facts_html}</dl>"#)
            ),
            card("Transaction History", &history),
        ),
    )
}

pub fn job_not_found_page(user: &User) -> String {
    layout(
        "Job Not Found",
        Some(user),
        &empty_state(
            "exclamation-triangle",
            "Job not found",
            "The job does not exist or could not be loaded.",
            Some(("Back to Jobs", "/jobs")),
        ),
    )
}

pub fn assign_page(
    user: &User,
    detail: &JobDetail,
    workers: &[User],
    values: &AssignForm,
    error: Option<&str>,
) -> String {
    let job = &detail.job;

    let mut worker_options = vec![(
        String::new(),
        "Select a worker".to_string(),
        values.worker_id.is_empty(),
    )];
    worker_options.extend(workers.iter().map(|w| {
        let id = w.id.to_string();
        let selected = id == values.worker_id;
        (id, format!("{} ({})", w.full_name, w.role), selected)
    }));

    let mut stage_options = vec![(
        String::new(),
        "Select a stage".to_string(),
        values.stage.is_empty(),
    )];
    stage_options.extend(Stage::ALL.iter().map(|s| {
        (s.as_str().to_string(), s.label().to_string(), values.stage == s.as_str())
    }));

    let fields = [
        select("worker_id", "Worker", &worker_options),
        select("stage", "Stage", &stage_options),
        input(
            "issued_weight",
            "Issued Weight (g)",
            "number",
            &values.issued_weight,
            WEIGHT_ATTRS,
        ),
        form_actions("Assign Job", &format!("/jobs/{}", job.id)),
    ]
    .concat();

    let summary = format!(
        r#"<p class="text-gray-700 mb-4">{category} &middot; initial weight {weight} &middot; {status}</p>"#,
        category = html_escape(&job.item_category),
        weight = grams(job.initial_weight),
        status = status_badge(&job.status),
    );

    layout(
        "Assign Job",
        Some(user),
        &format!(
            "{}{}{}",
            page_header(&format!("Assign Job {}", job.design_no), None),
            alert_opt(error),
            card(
                "Assignment",
                &format!("{summary}{}", form(&format!("/jobs/{}/assign", job.id), &fields))
            ),
        ),
    )
}

// =============================================================================
// Users
// =============================================================================

pub fn users_page(user: &User, users: Result<&[User], &str>, error: Option<&str>) -> String {
    let body = match users {
        Err(message) => alert(message),
        Ok(users) => {
            let rows: Vec<Vec<String>> = users
                .iter()
                .map(|u| {
                    vec![
                        html_escape(&u.username),
                        html_escape(&u.full_name),
                        or_dash(Some(u.email.as_str())),
                        role_badge(&u.role),
                        if u.is_active {
                            badge("Active", "green")
                        } else {
                            badge("Inactive", "gray")
                        },
                        format!(
                            r#"<form method="POST" action="/users/{id}/delete" onsubmit="return confirm('Are you sure you want to delete this user?')"><button type="submit" class="text-red-600 hover:underline">Delete</button></form>"#,
                            id = u.id
                        ),
                    ]
                })
                .collect();
            table(&["Username", "Full Name", "Email", "Role", "Status", "Actions"], &rows)
        }
    };

    layout(
        "Users",
        Some(user),
        &format!(
            "{}{}{body}",
            page_header("Users", Some(("Add New User", "/users/new"))),
            alert_opt(error),
        ),
    )
}

pub fn user_form_page(user: &User, values: &UserForm, error: Option<&str>) -> String {
    let mut role_options = vec![(
        String::new(),
        "Select a role".to_string(),
        values.role.is_empty(),
    )];
    role_options.extend(
        Role::ASSIGNABLE
            .iter()
            .map(|r| (r.as_str().to_string(), r.label().to_string(), values.role == r.as_str())),
    );

    let fields = [
        input("username", "Username", "text", &values.username, "required"),
        input("email", "Email", "email", &values.email, "required"),
        input("full_name", "Full Name", "text", &values.full_name, "required"),
        input("password", "Password", "password", "", "required"),
        select("role", "Role", &role_options),
        form_actions("Create User", "/users"),
    ]
    .concat();

    layout(
        "Create User",
        Some(user),
        &format!(
            "{}{}{}",
            page_header("Create New User", None),
            alert_opt(error),
            card("User", &form("/users", &fields)),
        ),
    )
}

// =============================================================================
// Reports
// =============================================================================

pub fn reports_page(user: &User, overview: Result<&ReportsOverview, &str>) -> String {
    let body = match overview {
        Err(message) => alert(message),
        Ok(overview) => {
            let workers: Vec<Vec<String>> = overview
                .worker_performance
                .iter()
                .map(|w| {
                    vec![
                        w.worker_id.to_string(),
                        html_escape(&w.worker_name),
                        html_escape(&w.role),
                        w.total_jobs.to_string(),
                        grams(w.total_loss),
                        percent(w.average_loss_percentage),
                    ]
                })
                .collect();
            let materials: Vec<Vec<String>> = overview
                .material_consumption
                .iter()
                .map(|m| {
                    vec![
                        html_escape(&m.item_category),
                        m.total_jobs.to_string(),
                        grams(m.total_initial_weight),
                        grams(m.total_loss),
                        percent(m.loss_percentage),
                    ]
                })
                .collect();
            format!(
                "{}{}",
                card(
                    "Worker Performance",
                    &table(
                        &["ID", "Name", "Role", "Total Jobs", "Total Loss", "Avg Loss %"],
                        &workers
                    ),
                ),
                card(
                    "Material Consumption by Category",
                    &table(
                        &["Category", "Total Jobs", "Initial Weight", "Total Loss", "Loss %"],
                        &materials
                    ),
                ),
            )
        }
    };

    layout(
        "Reports",
        Some(user),
        &format!("{}{body}", page_header("Reports & Analytics", None)),
    )
}

// =============================================================================
// Worker tasks
// =============================================================================

pub fn tasks_page(
    user: &User,
    tasks: Result<&[WorkerTask], &str>,
    values: Option<(i64, &CompleteForm)>,
    error: Option<&str>,
) -> String {
    let body = match tasks {
        Err(message) => alert(message),
        Ok([]) => empty_state(
            "check-circle",
            "No pending tasks",
            "You have no tasks assigned right now.",
            None,
        ),
        Ok(tasks) => {
            let rows: Vec<Vec<String>> = tasks
                .iter()
                .map(|task| {
                    let (weight, notes) = match values {
                        Some((id, form)) if id == task.transaction_id => {
                            (form.returned_weight.as_str(), form.notes.as_str())
                        }
                        _ => ("", ""),
                    };
                    vec![
                        html_escape(&task.design_no),
                        html_escape(&task.item_category),
                        html_escape(&task.stage),
                        grams(task.issued_weight),
                        display_date(&task.issued_at),
                        complete_form(task.transaction_id, weight, notes),
                    ]
                })
                .collect();
            table(
                &["Design No", "Category", "Stage", "Issued Weight", "Issued At", "Complete"],
                &rows,
            )
        }
    };

    layout(
        "My Tasks",
        Some(user),
        &format!("{}{}{body}", page_header("My Tasks", None), alert_opt(error)),
    )
}

fn complete_form(transaction_id: i64, weight: &str, notes: &str) -> String {
    format!(
        r##"<form method="POST" action="/worker/tasks/{transaction_id}/complete" class="flex items-center gap-2">
            <input type="number" name="returned_weight" value="{weight}" step="0.001" min="0" required placeholder="Returned (g)"
                   class="w-32 px-2 py-1 border border-gray-300 rounded-lg">
            <input type="text" name="notes" value="{notes}" placeholder="Notes"
                   class="w-40 px-2 py-1 border border-gray-300 rounded-lg">
            <button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-3 py-1 rounded-lg">Complete</button>
        </form>"##,
        weight = html_escape(weight),
        notes = html_escape(notes),
    )
}
