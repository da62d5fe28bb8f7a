use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    cwlogger_lambda_writer::run().await
}
