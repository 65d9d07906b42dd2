use clap::{App, Arg, ArgMatches, SubCommand};
use yatube_models::{groups::*, Connection};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("groups")
        .about("Manage groups")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .help("The title of the new group"),
                )
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("The URL slug of the new group"),
                )
                .arg(
                    Arg::with_name("description")
                        .short("d")
                        .long("description")
                        .takes_value(true)
                        .help("A short description of the new group"),
                )
                .about("Create a new group"),
        )
        .subcommand(SubCommand::with_name("list").about("List all groups"))
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("list", Some(_)) => list(conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let title = args
        .value_of("title")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Title"));
    let slug = args
        .value_of("slug")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Slug"));
    let description = args.value_of("description").unwrap_or("").to_string();

    Group::insert(
        conn,
        NewGroup {
            slug,
            title,
            description,
        },
    )
    .expect("Couldn't save your group");
}

fn list(conn: &Connection) {
    for group in Group::list(conn).expect("Couldn't load groups") {
        println!("{} ({})", group.title, group.slug);
    }
}
