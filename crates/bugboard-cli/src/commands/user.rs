use crate::cli::UserCommands;
use crate::support::{Session, exit_with_error, print_json, save_users_or_exit};
use bugboard_store::{IdentityProvider, Role};
use serde_json::json;

pub fn run(session: &Session, command: UserCommands) {
    match command {
        UserCommands::List { json } => run_list(session, json),
        UserCommands::Login {
            email,
            password,
            json,
        } => run_login(session, &email, &password, json),
        UserCommands::Register {
            name,
            email,
            role,
            password,
            json,
        } => run_register(session, &name, &email, role, &password, json),
    }
}

fn run_list(session: &Session, json_output: bool) {
    let (provider, path) = session.load_identity_or_exit();
    let users = provider.users();

    if json_output {
        let payload = json!({
            "action": "user.list",
            "usersPath": path.display().to_string(),
            "count": users.len(),
            "items": users
        });
        print_json(&payload);
    } else {
        println!(
            "bugboard user list\n  Path: {}\n  Count: {}",
            path.display(),
            users.len()
        );
        for user in users {
            println!("  - {} [{}] {} <{}>", user.id, user.role, user.name, user.email);
        }
    }
}

fn run_login(session: &Session, email: &str, password: &str, json_output: bool) {
    let (provider, _) = session.load_identity_or_exit();
    let user = provider
        .login(email, password)
        .unwrap_or_else(|| exit_with_error(format!("unknown user: {email}")));

    if json_output {
        let payload = json!({
            "action": "user.login",
            "user": user
        });
        print_json(&payload);
    } else {
        println!(
            "bugboard user login\n  Signed in: {} [{}] {}",
            user.id, user.role, user.name
        );
    }
}

fn run_register(
    session: &Session,
    name: &str,
    email: &str,
    role: Role,
    password: &str,
    json_output: bool,
) {
    let (mut provider, path) = session.load_identity_or_exit();
    let user = provider
        .register(name, email, password, role)
        .unwrap_or_else(|e| exit_with_error(e));
    save_users_or_exit(provider.users(), &path);

    if json_output {
        let payload = json!({
            "action": "user.register",
            "usersPath": path.display().to_string(),
            "user": user
        });
        print_json(&payload);
    } else {
        println!(
            "bugboard user register\n  Added: {} [{}] {}\n  Path: {}",
            user.id,
            user.role,
            user.name,
            path.display()
        );
    }
}
