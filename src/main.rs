//! Calendar Puzzle Solver
//!
//! Solves the daily calendar tiling puzzle: ten flat pieces must cover a
//! 7x8 board of month, day and weekday cells so that only the target
//! date's three cells stay open. Solutions are printed as a text grid and
//! saved per date to `solutions.json`.

use std::path::Path;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::Rng;
use rustc_hash::FxHashSet;

use daypack::persistence::{SolutionBook, SOLUTIONS_FILE};
use daypack::{
    board, catalog, date, solution_key, solver, Board, Date, Holes, Outcome, Piece, PlacedPiece,
    SolveOptions,
};

/// Solves the calendar tiling puzzle for a target date.
#[derive(Parser)]
#[command(name = "daypack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve for a date (default: today) and save the solution.
    Solve {
        /// Target date as YYYY-MM-DD.
        date: Option<String>,
        /// Solve a random date of the current year instead.
        #[arg(long, conflicts_with = "date")]
        random: bool,
    },
    /// Find a solution that differs from the saved one for a date.
    Next {
        /// Target date as YYYY-MM-DD.
        date: Option<String>,
    },
    /// Display the saved solution for a date.
    Show {
        /// Target date as YYYY-MM-DD.
        date: Option<String>,
    },
    /// Re-check the saved solution for a date.
    Check {
        /// Target date as YYYY-MM-DD.
        date: Option<String>,
    },
    /// Show the number of saved solutions.
    Count,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Solve { date, random }) => {
            if let Some(date) = resolve_date(date, random) {
                run_solve(&date);
            }
        }
        Some(Command::Next { date }) => {
            if let Some(date) = resolve_date(date, false) {
                run_next(&date);
            }
        }
        Some(Command::Show { date }) => {
            if let Some(date) = resolve_date(date, false) {
                run_show(&date);
            }
        }
        Some(Command::Check { date }) => {
            if let Some(date) = resolve_date(date, false) {
                run_check(&date);
            }
        }
        Some(Command::Count) => run_count(),
        None => run_solve(&Date::today()),
    }
}

/// Parses the date argument, defaulting to today.
fn resolve_date(arg: Option<String>, random: bool) -> Option<Date> {
    if random {
        return Some(random_date());
    }
    match arg {
        None => Some(Date::today()),
        Some(text) => match text.parse::<Date>() {
            Ok(date) => Some(date),
            Err(err) => {
                eprintln!("Bad date '{text}': {err}");
                None
            }
        },
    }
}

/// A random date in the current year.
fn random_date() -> Date {
    let year = Date::today().year();
    let mut rng = rand::thread_rng();
    let month_index = rng.gen_range(0..12u8);
    let day = rng.gen_range(1..=date::days_in_month(year, month_index));
    Date::new(year, month_index, day).expect("generated day is within the month")
}

/// Standard board, catalog and the date's holes; prints on failure.
fn puzzle_for(date: &Date) -> Option<(Board, Vec<Piece>, Holes)> {
    let board = Board::standard();
    let pieces = catalog();
    match board.holes_for(&date.target()) {
        Ok(holes) => Some((board, pieces, holes)),
        Err(err) => {
            eprintln!("Cannot target {date}: {err}");
            None
        }
    }
}

/// Human-readable date line, e.g. "Tues, Feb 3, 2026".
fn describe(date: &Date) -> String {
    format!(
        "{}, {} {}, {}",
        board::WEEKDAYS[date.weekday_index() as usize],
        board::MONTHS[date.month_index() as usize],
        date.day(),
        date.year()
    )
}

/// Solves the puzzle for a date, prints the result and saves it.
fn run_solve(date: &Date) {
    let Some((board, pieces, holes)) = puzzle_for(date) else {
        return;
    };

    let started = Instant::now();
    let outcome = match solver::solve(&board, &date.target(), &pieces) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Cannot solve {date}: {err}");
            return;
        }
    };
    let elapsed = started.elapsed();

    match outcome {
        Outcome::Solved(placements) => {
            println!("{}", describe(date));
            println!("{}", board::render(&board, &holes, &pieces, &placements));
            println!("Solved in {} ms", elapsed.as_millis());
            save_solution(date, placements);
        }
        Outcome::NoSolution => {
            println!("No solution for {} ({} ms)", describe(date), elapsed.as_millis());
        }
        Outcome::Cancelled => eprintln!("Search cancelled"),
    }
}

/// Solves for an assignment that differs from the saved one, cycling back
/// to an unconstrained solve once the alternatives run out.
fn run_next(date: &Date) {
    let Some((board, pieces, holes)) = puzzle_for(date) else {
        return;
    };
    let book = match SolutionBook::load(Path::new(SOLUTIONS_FILE)) {
        Ok(book) => book,
        Err(err) => {
            eprintln!("Failed to read {SOLUTIONS_FILE}: {err}");
            return;
        }
    };

    let mut excluded = FxHashSet::default();
    if let Some(saved) = book.get(&date.key()) {
        excluded.insert(solution_key(saved));
    }

    let started = Instant::now();
    let options = SolveOptions {
        exclude: Some(&excluded),
        ..Default::default()
    };
    let mut outcome = match solver::solve_with(&board, &date.target(), &pieces, &options) {
        Ok((outcome, _)) => outcome,
        Err(err) => {
            eprintln!("Cannot solve {date}: {err}");
            return;
        }
    };

    let mut recycled = false;
    if outcome == Outcome::NoSolution && !excluded.is_empty() {
        // the saved solution was the only one; start the cycle over
        recycled = true;
        outcome = match solver::solve(&board, &date.target(), &pieces) {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("Cannot solve {date}: {err}");
                return;
            }
        };
    }
    let elapsed = started.elapsed();

    match outcome {
        Outcome::Solved(placements) => {
            println!("{}", describe(date));
            println!("{}", board::render(&board, &holes, &pieces, &placements));
            if recycled {
                println!("Solved in {} ms (back to the first solution)", elapsed.as_millis());
            } else {
                println!("Solved in {} ms (different solution)", elapsed.as_millis());
            }
            save_solution(date, placements);
        }
        Outcome::NoSolution => {
            println!("No solution for {} ({} ms)", describe(date), elapsed.as_millis());
        }
        Outcome::Cancelled => eprintln!("Search cancelled"),
    }
}

/// Displays the saved solution for a date.
fn run_show(date: &Date) {
    let book = match SolutionBook::load(Path::new(SOLUTIONS_FILE)) {
        Ok(book) => book,
        Err(err) => {
            eprintln!("Failed to read {SOLUTIONS_FILE}: {err}");
            return;
        }
    };
    let Some(placements) = book.get(&date.key()) else {
        eprintln!("No saved solution for {date}. Run 'daypack solve {date}' first.");
        return;
    };
    let Some((board, pieces, holes)) = puzzle_for(date) else {
        return;
    };

    println!("{}", describe(date));
    println!("{}", board::render(&board, &holes, &pieces, placements));
}

/// Re-checks the saved solution for a date against the board.
fn run_check(date: &Date) {
    let book = match SolutionBook::load(Path::new(SOLUTIONS_FILE)) {
        Ok(book) => book,
        Err(err) => {
            eprintln!("Failed to read {SOLUTIONS_FILE}: {err}");
            return;
        }
    };
    let Some(placements) = book.get(&date.key()) else {
        eprintln!("No saved solution for {date}. Run 'daypack solve {date}' first.");
        return;
    };
    let Some((board, pieces, holes)) = puzzle_for(date) else {
        return;
    };

    match solver::verify(&board, &holes, &pieces, placements) {
        Ok(()) => println!("Solution for {date} checks out."),
        Err(err) => eprintln!("Solution for {date} is invalid: {err}"),
    }
}

/// Prints the count of saved solutions.
fn run_count() {
    match SolutionBook::load(Path::new(SOLUTIONS_FILE)) {
        Ok(book) => println!("{} saved solutions", book.len()),
        Err(err) => eprintln!("Failed to read {SOLUTIONS_FILE}: {err}"),
    }
}

/// Stores a solution in the book, creating the file if needed.
fn save_solution(date: &Date, placements: Vec<PlacedPiece>) {
    let path = Path::new(SOLUTIONS_FILE);
    let mut book = match SolutionBook::load(path) {
        Ok(book) => book,
        Err(err) => {
            eprintln!("Failed to read {SOLUTIONS_FILE}: {err}");
            return;
        }
    };
    book.insert(date.key(), placements);
    match book.save(path) {
        Ok(()) => println!("Saved to {SOLUTIONS_FILE}"),
        Err(err) => eprintln!("Failed to save solutions: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daypack::TargetDate;

    #[test]
    fn test_solves_february_third_tuesday() {
        let board = Board::standard();
        let pieces = catalog();
        let target = TargetDate {
            month_index: 1,
            day: 3,
            weekday_index: 2,
        };

        let outcome = solver::solve(&board, &target, &pieces).expect("valid configuration");
        let placements = outcome.solution().expect("expected a solution");
        assert_eq!(placements.len(), 10);

        let holes = board.holes_for(&target).unwrap();
        solver::verify(&board, &holes, &pieces, placements).expect("solver output must verify");
    }

    #[test]
    fn test_solves_new_years_thursday() {
        // 2026-01-01 falls on a Thursday
        let board = Board::standard();
        let pieces = catalog();
        let target = Date::new(2026, 0, 1).unwrap().target();
        assert_eq!(target.weekday_index, 4);

        let outcome = solver::solve(&board, &target, &pieces).expect("valid configuration");
        let placements = outcome.solution().expect("expected a solution");
        let holes = board.holes_for(&target).unwrap();
        solver::verify(&board, &holes, &pieces, placements).expect("solver output must verify");
    }

    #[test]
    fn test_repeat_solves_agree() {
        let board = Board::standard();
        let pieces = catalog();
        let target = TargetDate {
            month_index: 1,
            day: 3,
            weekday_index: 2,
        };

        let first = solver::solve(&board, &target, &pieces).unwrap();
        let second = solver::solve(&board, &target, &pieces).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_describe_formats_the_date() {
        let date = Date::new(2026, 1, 3).unwrap();
        assert_eq!(describe(&date), "Tues, Feb 3, 2026");
    }

    #[test]
    fn test_random_date_is_always_valid() {
        for _ in 0..100 {
            let date = random_date();
            let parsed: Date = date.key().parse().expect("random date must be valid");
            assert_eq!(parsed, date);
        }
    }
}
