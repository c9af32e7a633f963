use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use mgit_commit::{create_commit, snapshot, History};
use mgit_diff::{diff_commits, diff_trees, DiffLine, LeafDiffer, TextDiffer, TreeChange, TreeDiff};
use mgit_refs::RefStore;
use mgit_store::{Object, ObjectKind, ObjectStore};
use mgit_tree::{EntryMode, Tree};
use mgit_types::Digest;

use crate::cli::*;
use crate::repo::Repo;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    match cli.command {
        Command::Init(_) => cmd_init(&cwd),
        Command::Add(args) => cmd_add(&cwd, args),
        Command::Remove(args) => cmd_remove(&cwd, args),
        Command::Commit(args) => cmd_commit(&cwd, args),
        Command::Log(args) => cmd_log(&cwd, args),
        Command::Diff(args) => cmd_diff(&cwd, args),
        Command::Branch(args) => cmd_branch(&cwd, args),
        Command::Checkout(args) => cmd_checkout(&cwd, args),
        Command::Reset(args) => cmd_reset(&cwd, args),
        Command::CatFile(args) => cmd_cat_file(&cwd, args),
        Command::ShowIndex(_) => cmd_show_index(&cwd),
    }
}

fn parse_digest(s: &str) -> anyhow::Result<Digest> {
    Digest::from_hex(s).with_context(|| format!("invalid object digest {s:?}"))
}

fn summary(message: Option<&str>) -> &str {
    message
        .and_then(|m| m.lines().next())
        .unwrap_or("(no message)")
}

fn cmd_init(cwd: &Path) -> anyhow::Result<()> {
    let repo = Repo::init(cwd)?;
    println!(
        "Initialized empty repository in {}",
        repo.root().display().to_string().bold()
    );
    Ok(())
}

#[cfg(unix)]
fn file_mode(meta: &std::fs::Metadata) -> EntryMode {
    use std::os::unix::fs::PermissionsExt;
    if meta.permissions().mode() & 0o111 != 0 {
        EntryMode::Executable
    } else {
        EntryMode::Regular
    }
}

#[cfg(not(unix))]
fn file_mode(_meta: &std::fs::Metadata) -> EntryMode {
    EntryMode::Regular
}

fn cmd_add(cwd: &Path, args: AddArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;
    let mut index = repo.load_index()?;

    for path in &args.paths {
        let full = repo.workdir().join(path);
        let meta = std::fs::symlink_metadata(&full)
            .with_context(|| format!("cannot stage {path:?}"))?;

        let (mode, content) = if meta.file_type().is_symlink() {
            let target = std::fs::read_link(&full)?;
            (
                EntryMode::Symlink,
                target.to_string_lossy().into_owned().into_bytes(),
            )
        } else {
            let content =
                std::fs::read(&full).with_context(|| format!("cannot read {path:?}"))?;
            (file_mode(&meta), content)
        };

        let digest = repo.store.put(&Object::blob(content))?.digest();
        index.stage(path, mode, digest)?;
        println!("{} {} ({})", "staged:".green(), path, digest.short_hex().dimmed());
    }

    repo.save_index(&index)
}

fn cmd_remove(cwd: &Path, args: RemoveArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;
    let mut index = repo.load_index()?;

    for path in &args.paths {
        let entry = index.unstage(path)?;
        if args.delete_objects {
            repo.store.delete(&entry.digest)?;
        }
        println!("{} {}", "removed:".red(), path);
    }

    repo.save_index(&index)
}

fn cmd_commit(cwd: &Path, args: CommitArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;
    let index = repo.load_index()?;
    let head = repo.head_commit()?;
    let parent = head.as_ref().map(|(digest, _)| *digest);

    let next = snapshot(&repo.store, &index, parent.as_ref())?;
    match &head {
        Some((_, head_commit)) if head_commit.tree == next.digest() => {
            println!("Nothing to commit.");
            return Ok(());
        }
        None if next.is_empty() => {
            println!("Nothing to commit.");
            return Ok(());
        }
        _ => {}
    }

    let author = match args.author {
        Some(author) => author,
        None => repo.config()?.author(),
    };
    let digest = create_commit(
        &repo.store,
        &index,
        parent,
        &author,
        args.message.as_deref(),
    )?;
    repo.refs.update_head(digest)?;
    repo.clear_index()?;

    println!(
        "[{} {}] {}",
        repo.refs.current_branch()?.yellow(),
        digest.short_hex().dimmed(),
        summary(args.message.as_deref())
    );
    Ok(())
}

fn cmd_log(cwd: &Path, args: LogArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;
    let Some((head, _)) = repo.head_commit()? else {
        println!("No commits yet.");
        return Ok(());
    };

    for item in History::new(&repo.store, head).take(args.limit) {
        let (digest, commit) = item?;
        if args.oneline {
            println!(
                "{} {}",
                digest.short_hex().yellow(),
                summary(commit.message.as_deref())
            );
        } else {
            println!("{} {}", "commit".yellow().bold(), digest.to_hex().yellow());
            println!("author {}", commit.author);
            if let Some(message) = &commit.message {
                println!();
                for line in message.lines() {
                    println!("    {line}");
                }
            }
            println!();
        }
    }
    Ok(())
}

fn cmd_diff(cwd: &Path, args: DiffArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;

    let diff = match (&args.commit, &args.second) {
        // Two commits against each other.
        (Some(a), Some(b)) => {
            let old = parse_digest(a)?;
            let new = parse_digest(b)?;
            diff_commits(&repo.store, Some(&old), &new)?
        }
        // A commit (HEAD when omitted) against the prospective next
        // snapshot: HEAD's tree with the staged entries folded in.
        _ => {
            let head = repo.head_commit()?.map(|(digest, _)| digest);
            let base = match &args.commit {
                Some(hex) => Some(parse_digest(hex)?),
                None => head,
            };
            let base_tree = match &base {
                Some(digest) => Some(repo.load_tree(&repo.load_commit(digest)?.tree)?),
                None => None,
            };
            let next = snapshot(&repo.store, &repo.load_index()?, head.as_ref())?;
            diff_trees(&repo.store, base_tree.as_ref(), Some(&next))?
        }
    };

    if diff.is_empty() {
        println!("No changes.");
        return Ok(());
    }
    render_diff(&repo, &diff, args.stat)
}

fn render_diff(repo: &Repo, diff: &TreeDiff, stat_only: bool) -> anyhow::Result<()> {
    for change in &diff.changes {
        match change {
            TreeChange::Added {
                path, new_digest, ..
            } => {
                println!("{} {}", "A".green().bold(), path);
                if !stat_only {
                    render_hunks(repo, None, Some(new_digest))?;
                }
            }
            TreeChange::Removed {
                path, old_digest, ..
            } => {
                println!("{} {}", "D".red().bold(), path);
                if !stat_only {
                    render_hunks(repo, Some(old_digest), None)?;
                }
            }
            TreeChange::Modified {
                path,
                old_digest,
                new_digest,
                ..
            } => {
                println!("{} {}", "M".yellow().bold(), path);
                if !stat_only {
                    render_hunks(repo, Some(old_digest), Some(new_digest))?;
                }
            }
            TreeChange::TypeChanged {
                path,
                old_mode,
                new_mode,
                ..
            } => {
                println!(
                    "{} {} ({} -> {})",
                    "T".magenta().bold(),
                    path,
                    old_mode,
                    new_mode
                );
            }
        }
    }
    Ok(())
}

fn render_hunks(
    repo: &Repo,
    old: Option<&Digest>,
    new: Option<&Digest>,
) -> anyhow::Result<()> {
    let old_content = match old {
        Some(digest) => repo.store.get(digest)?.content,
        None => Vec::new(),
    };
    let new_content = match new {
        Some(digest) => repo.store.get(digest)?.content,
        None => Vec::new(),
    };

    let blob_diff = TextDiffer::new().diff_leaves(&old_content, &new_content);
    for hunk in &blob_diff.hunks {
        println!(
            "{}",
            format!(
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            )
            .cyan()
        );
        for line in &hunk.lines {
            match line {
                DiffLine::Context(text) => println!(" {text}"),
                DiffLine::Added(text) => println!("{}", format!("+{text}").green()),
                DiffLine::Removed(text) => println!("{}", format!("-{text}").red()),
            }
        }
    }
    Ok(())
}

fn cmd_branch(cwd: &Path, args: BranchArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;

    if args.delete {
        let name = args.name.context("branch name required with --delete")?;
        if !repo.refs.delete_branch(&name)? {
            anyhow::bail!("branch {name:?} not found");
        }
        println!("Deleted branch {}", name.yellow());
        return Ok(());
    }

    if let Some(name) = args.name {
        let target = repo.refs.head_digest()?;
        repo.refs.create_branch(&name, target)?;
        println!("Created branch {}", name.yellow());
        return Ok(());
    }

    let current = repo.refs.current_branch()?;
    for (name, target) in repo.refs.list_branches()? {
        let marker = if name == current { "*" } else { " " };
        let target = match target {
            Some(digest) => digest.short_hex().dimmed(),
            None => "(unborn)".dimmed(),
        };
        if name == current {
            println!("{marker} {} {target}", name.green().bold());
        } else {
            println!("{marker} {name} {target}");
        }
    }
    Ok(())
}

fn cmd_checkout(cwd: &Path, args: CheckoutArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;

    if args.create {
        let target = repo.refs.head_digest()?;
        repo.refs.create_branch(&args.branch, target)?;
    }
    repo.refs.set_head(&args.branch)?;
    repo.clear_index()?;

    println!("Switched to branch {}", args.branch.yellow().bold());
    Ok(())
}

fn cmd_reset(cwd: &Path, args: ResetArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;
    let digest = parse_digest(&args.commit)?;
    let commit = repo.load_commit(&digest)?;

    repo.refs.update_head(digest)?;
    repo.clear_index()?;

    println!(
        "HEAD is now at {} {}",
        digest.short_hex().yellow(),
        summary(commit.message.as_deref())
    );
    Ok(())
}

fn cmd_cat_file(cwd: &Path, args: CatFileArgs) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;
    let digest = parse_digest(&args.digest)?;
    let object = repo.store.get(&digest)?;

    if args.kind {
        println!("{}", object.kind);
        return Ok(());
    }
    if args.size {
        println!("{}", object.content.len());
        return Ok(());
    }

    match object.kind {
        ObjectKind::Tree => {
            let tree = Tree::from_object(&object)?;
            for entry in tree.entries() {
                let kind = if entry.mode.is_tree() { "tree" } else { "blob" };
                println!("{} {kind} {}\t{}", entry.mode, entry.digest, entry.name);
            }
        }
        ObjectKind::Blob | ObjectKind::Commit => {
            std::io::stdout().write_all(&object.content)?;
        }
    }
    Ok(())
}

fn cmd_show_index(cwd: &Path) -> anyhow::Result<()> {
    let repo = Repo::discover(cwd)?;
    let index = repo.load_index()?;

    if index.is_empty() {
        println!("Index is empty.");
        return Ok(());
    }
    for entry in index.entries() {
        println!("{} {} {}", entry.mode, entry.digest, entry.path);
    }
    Ok(())
}
