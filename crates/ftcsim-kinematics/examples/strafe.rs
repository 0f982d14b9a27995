use ftcsim_kinematics::*;

fn main() {
    let half_track = 7.0;
    let half_wheelbase = 8.0;
    let wheel_radius = 2.0;
    let kinematics_result = MecanumDrive::new(half_track, half_wheelbase, wheel_radius);

    let max_speed = 10.0; // distance per step at full command
    let commands = MecanumDrive::mix(0.5, 0.5, 0.0); // diagonal, no turning
    let num_steps = 10;

    match kinematics_result {
        Ok(kinematics) => {
            println!("Initializing simulation...");
            println!("  Mecanum Drive Parameters: {}", kinematics);
            println!("  Wheel Commands: {:?}", commands);
            println!("  Num Steps: {}", num_steps);
            println!("\nSimulating...");

            let mut pose = Pose::default();
            for i in 0..num_steps {
                let d = kinematics.solve(commands);
                let distance = correct_speed(d.distance(), d.direction(), max_speed);
                let angle = d.direction() - pose.theta;
                pose.x += distance * angle.cos();
                pose.y += distance * angle.sin();
                pose.theta += d.dtheta;
                println!("Step {:>2}: {} -> Pose: {}", i + 1, d, pose);
            }

            println!("\nSimulation complete.");
            println!("Final Pose: {:?}", pose);
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {}", e);
        }
    }
}
