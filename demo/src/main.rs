use log::info;
use strided::{GResult, Matrix};

fn main() -> GResult<()> {
    env_logger::init();

    let a = Matrix::<f64>::new(4, 5)?;
    a.fill(&[
        4.0, 2.0, 7.0, 9.0, 1.0, //
        5.0, 0.0, 1.0, 8.0, 3.0, //
        5.0, 6.0, 3.0, 2.0, 1.0, //
        7.0, 9.0, 0.0, 1.0, 2.0,
    ])?;

    let b = Matrix::<f64>::new(5, 3)?;
    b.fill(&[
        3.0, 4.0, 5.0, //
        0.0, 3.0, 1.0, //
        3.0, 2.0, 1.0, //
        8.0, 2.0, 6.0, //
        2.0, 7.0, 1.0,
    ])?;

    a.matmul(&b)?.print();

    let c = a.matmul_dot(&b)?;
    c.print();

    c.transpose().print();

    let (n, m) = c.shape();
    for i in 0..n {
        println!("{}", c.row(i)?);
    }
    for j in 0..m {
        println!("{}", c.col(j)?);
    }
    info!("done");
    Ok(())
}
