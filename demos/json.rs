use conebridge::bridge::*;
use conebridge::io::JsonReadWrite;
use std::env;
use std::fs::File;

fn main() {
    // usage: json <problem.json> [<result.json>]
    let mut argv = env::args().skip(1);
    let Some(infile) = argv.next() else {
        eprintln!("usage: json <problem.json> [<result.json>]");
        return;
    };

    let mut file = File::open(&infile).unwrap();
    let args = SolveArgs::read_from_file(&mut file).unwrap();

    let out = solve_default(&args).unwrap();
    println!("{}: {} after {} iterations", infile, out.info.status, out.info.iter);

    // to write the result back to a new file
    if let Some(outfile) = argv.next() {
        let mut file = File::create(outfile).unwrap();
        out.write_to_file(&mut file).unwrap();
    }
}
